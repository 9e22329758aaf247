//! `kinfo show` command.

use std::process::ExitCode;

use anyhow::Result;

use crate::opts::{RootOpts, load_store};
use crate::output::{data_to_json, print_json};

pub fn cmd_show(opts: &RootOpts) -> Result<ExitCode> {
    let store = load_store(opts)?;
    print_json(&data_to_json(store.data())?)?;
    Ok(ExitCode::SUCCESS)
}
