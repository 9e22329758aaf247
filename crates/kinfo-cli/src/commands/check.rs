//! `kinfo check` command.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use kinfo_store::{GateOptions, KernelEnv, KernelInfo};
use serde_json::json;

use crate::opts::{RootOpts, resolve_root};
use crate::output::print_json;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Report the result but exit successfully even when incompatible
    #[arg(long)]
    pub no_exit: bool,

    /// Suppress the operator diagnostics
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

pub fn cmd_check(opts: &RootOpts, args: &CheckArgs) -> Result<ExitCode> {
    let root = resolve_root(opts)?;
    let info = KernelInfo::init(KernelEnv::new(&root, Vec::new()))
        .with_context(|| format!("initialize kernel info at {}", root.display()))?;
    let status = info.check_data_system_version(GateOptions::new(!args.no_exit, !args.quiet));

    if opts.json {
        print_json(&json!({
            "compatible": status.is_compatible(),
            "system_version": info.manifest().version.to_string(),
            "failure": status.failure().map(|f| f.to_string()),
        }))?;
    } else {
        match status.failure() {
            None => println!("compatible"),
            Some(failure) => println!("incompatible: {failure}"),
        }
    }
    std::io::stdout().flush()?;

    // Exit only after everything above has been flushed.
    Ok(match status.exit_code() {
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::SUCCESS,
    })
}
