use std::time::Instant;

use clap::ArgGroup;
use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use mefx_cli::{CatalogOptions, MefxOptions, RejectionOptions, run_main};
use mefx_error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "mefx",
    about = "mefx: find out why your parts were rejected",
    version,
    group = ArgGroup::new("inputs").required(true).multiple(true).args(["files", "dirs"])
)]
pub struct Cli {
    /// Composition report files to load (repeatable)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        num_args = 1..,
        action = clap::ArgAction::Append
    )]
    files: Vec<String>,

    /// Directories to scan recursively for *.json reports (repeatable)
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        num_args = 1..,
        action = clap::ArgAction::Append
    )]
    dirs: Vec<String>,

    /// Print qualified part names and full rejection messages
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,

    #[command(flatten)]
    catalog: CatalogOptions,

    #[command(flatten)]
    rejection: RejectionOptions,
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = MefxOptions::new(args.files, args.dirs)
        .with_verbose(args.verbose)
        .with_catalog(args.catalog)
        .with_rejection(args.rejection);

    match run_main(&opts) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "execution failed");
            if e.is_fatal() {
                return Err(e);
            }
        }
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}
