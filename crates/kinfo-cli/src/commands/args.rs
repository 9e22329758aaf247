//! `kinfo args` command.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use kinfo_store::KernelEnv;

use crate::opts::{RootOpts, resolve_root};
use crate::output::print_json;

#[derive(Args, Debug)]
pub struct ArgsArgs {
    /// Arguments passed through to the application
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

pub fn cmd_args(opts: &RootOpts, args: &ArgsArgs) -> Result<ExitCode> {
    let env = KernelEnv::new(resolve_root(opts)?, args.rest.clone());
    if opts.json {
        print_json(&serde_json::json!({
            "working_root": env.working_root().display().to_string(),
            "windows": env.is_windows(),
            "cli_args": env.cli_args(),
        }))?;
    } else {
        for arg in env.cli_args() {
            println!("{arg}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
