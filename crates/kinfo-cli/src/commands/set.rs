//! `kinfo set` command.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::opts::{RootOpts, load_store};

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Key to write
    pub key: String,

    /// JSON value (e.g. '"text"', '42', '{"a": [1, 2]}')
    pub value: String,
}

pub fn cmd_set(opts: &RootOpts, args: &SetArgs) -> Result<ExitCode> {
    let json: serde_json::Value = serde_json::from_str(&args.value)
        .with_context(|| format!("parse JSON value for '{}'", args.key))?;
    let value = kinfo_cbor::to_value(&json).context("convert JSON to CBOR")?;

    let mut store = load_store(opts)?;
    if !store.set(args.key.as_str(), value) {
        bail!("'{}' is a reserved identifier and cannot be assigned", args.key);
    }
    store
        .save()
        .with_context(|| format!("save kernel data to {}", store.path().display()))?;
    tracing::debug!(key = %args.key, "kernel data updated");
    Ok(ExitCode::SUCCESS)
}
