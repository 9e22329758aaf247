//! `kinfo arch` command.

use std::process::ExitCode;

use anyhow::Result;
use kinfo_store::KERNEL_ARCH_VERSIONS;
use serde_json::json;

use crate::opts::RootOpts;
use crate::output::print_json;

pub fn cmd_arch(opts: &RootOpts) -> Result<ExitCode> {
    if opts.json {
        let entries: Vec<_> = KERNEL_ARCH_VERSIONS
            .iter()
            .map(|arch| json!({ "identifier": arch.identifier, "version": arch.version }))
            .collect();
        print_json(&serde_json::Value::Array(entries))?;
    } else {
        for arch in KERNEL_ARCH_VERSIONS {
            println!("{}\t{}", arch.identifier, arch.version);
        }
    }
    Ok(ExitCode::SUCCESS)
}
