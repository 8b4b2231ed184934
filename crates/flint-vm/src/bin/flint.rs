// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI driver: load a bytecode image from disk and run it to completion.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flint_vm::Vm;
use tracing_subscriber::EnvFilter;

/// Run a Flint bytecode image.
#[derive(Parser, Debug)]
#[command(name = "flint")]
#[command(about = "Run a Flint bytecode image", long_about = None)]
struct Args {
    /// Path to the bytecode image to execute.
    image: PathBuf,

    /// Raise the dispatch loop's tracing filter to `trace` for this run.
    #[arg(long)]
    trace: bool,
}

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.trace);

    let image = match std::fs::read(&args.image) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(path = %args.image.display(), error = %err, "failed to read image");
            return ExitCode::FAILURE;
        }
    };

    let mut vm = Vm::new();
    match vm.execute(&image) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "execution failed");
            ExitCode::FAILURE
        }
    }
}
