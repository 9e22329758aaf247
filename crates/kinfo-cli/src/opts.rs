//! Global CLI options and working-root resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kinfo_store::{KernelStore, env::executable_root};

/// Global options for CLI commands.
#[derive(Args, Debug, Clone)]
pub struct RootOpts {
    /// Working root holding package.json and .kernel.bes (env: KINFO_ROOT,
    /// default: directory of the kinfo executable)
    #[arg(short = 'r', long, global = true, env = "KINFO_ROOT")]
    pub root: Option<PathBuf>,

    /// Emit JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,
}

/// Resolve the working root.
///
/// Priority:
/// 1. `--root` / `-r` flag
/// 2. `KINFO_ROOT` env var (handled by Clap)
/// 3. Directory of the running executable
pub fn resolve_root(opts: &RootOpts) -> Result<PathBuf> {
    if let Some(root) = &opts.root {
        return Ok(root.clone());
    }
    executable_root().context("resolve executable directory")
}

/// Kernel store under the working root with its data loaded.
pub fn load_store(opts: &RootOpts) -> Result<KernelStore> {
    let root = resolve_root(opts)?;
    let mut store = KernelStore::open(&root);
    store
        .load()
        .with_context(|| format!("load kernel data from {}", store.path().display()))?;
    Ok(store)
}
