//! `kinfo init` command.

use std::cmp::Ordering;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;
use kinfo_store::{VERSION_KEY, Value, load_project_manifest};
use kinfo_version::Version;

use crate::opts::{RootOpts, load_store, resolve_root};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Data version to record (defaults to the version in package.json)
    #[arg(long = "data-version")]
    pub data_version: Option<String>,

    /// Allow recording a version older than the one already stored
    #[arg(long)]
    pub force: bool,
}

pub fn cmd_init(opts: &RootOpts, args: &InitArgs) -> Result<ExitCode> {
    let target: Version = match &args.data_version {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid data version '{raw}'"))?,
        None => {
            let root = resolve_root(opts)?;
            load_project_manifest(&root)
                .context("read application manifest")?
                .version
        }
    };

    let mut store = load_store(opts)?;
    if let Some(Value::Text(current)) = store.get(VERSION_KEY) {
        if let Ok(current) = current.parse::<Version>() {
            if target.cmp_with(&current, false) == Ordering::Less && !args.force {
                bail!(
                    "stored data version {current} is newer than {target}; pass --force to downgrade"
                );
            }
        }
    }

    store.set(VERSION_KEY, Value::Text(target.to_string()));
    store
        .save()
        .with_context(|| format!("save kernel data to {}", store.path().display()))?;
    tracing::info!(version = %target, "kernel data initialized");

    println!(
        "Kernel data initialized at {} (version {target})",
        store.path().display()
    );
    Ok(ExitCode::SUCCESS)
}
