//! `kinfo get` command.

use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Args;

use crate::opts::{RootOpts, load_store};
use crate::output::{print_json, to_json};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Key to read
    pub key: String,
}

pub fn cmd_get(opts: &RootOpts, args: &GetArgs) -> Result<ExitCode> {
    let store = load_store(opts)?;
    let Some(value) = store.get(&args.key) else {
        bail!("no kernel data under '{}'", args.key);
    };
    print_json(&to_json(value)?)?;
    Ok(ExitCode::SUCCESS)
}
