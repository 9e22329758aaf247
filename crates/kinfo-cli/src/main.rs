mod commands;
mod opts;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::args::ArgsArgs;
use commands::check::CheckArgs;
use commands::get::GetArgs;
use commands::init::InitArgs;
use commands::set::SetArgs;
use opts::RootOpts;

#[derive(Parser, Debug)]
#[command(name = "kinfo", version, about = "Kernel data store and version gate")]
struct Cli {
    #[command(flatten)]
    opts: RootOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record the data version in the kernel data file
    Init(InitArgs),

    /// Check that stored data is compatible with the application version
    Check(CheckArgs),

    /// Print one kernel data value as JSON
    Get(GetArgs),

    /// Store a JSON value under a key and save
    Set(SetArgs),

    /// Print all kernel data as JSON
    Show,

    /// List architecture version descriptors
    Arch,

    /// Print the pass-through launch arguments
    Args(ArgsArgs),
}

fn main() -> Result<ExitCode> {
    setup_logging();
    let cli = Cli::parse();
    let opts = &cli.opts;

    match cli.command {
        Command::Init(args) => commands::init::cmd_init(opts, &args),
        Command::Check(args) => commands::check::cmd_check(opts, &args),
        Command::Get(args) => commands::get::cmd_get(opts, &args),
        Command::Set(args) => commands::set::cmd_set(opts, &args),
        Command::Show => commands::show::cmd_show(opts),
        Command::Arch => commands::arch::cmd_arch(opts),
        Command::Args(args) => commands::args::cmd_args(opts, &args),
    }
}

/// Log to stderr, filtered by `KINFO_LOG` (default: warn).
fn setup_logging() {
    let filter = EnvFilter::try_from_env("KINFO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();
}
