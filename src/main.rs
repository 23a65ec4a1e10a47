//! # sdb
//!
//! Command-line entry point for the debugger.

use clap::Parser;
use sdb::mach::{Cpu, Runtime, DEFAULT_CAPACITY};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sdb")]
#[command(version)]
#[command(about = "Simple debugger for a RISC-V emulator", long_about = None)]
struct Cli {
    /// Raw RV32I image loaded at 0x80000000 (the built-in program when omitted)
    #[arg(value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Run the program to completion without a prompt
    #[arg(short, long)]
    batch: bool,

    /// Number of watchpoint records
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_CAPACITY)]
    watchpoints: usize,

    /// Write log output to FILE instead of stderr
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn init_tracing(log: Option<&PathBuf>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "sdb=warn".into());
    let registry = tracing_subscriber::registry().with(filter);
    match log {
        Some(path) => {
            let file = File::create(path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_tracing(cli.log.as_ref()) {
        eprintln!("sdb: cannot open log file: {}", error);
        return ExitCode::FAILURE;
    }

    let cpu = match &cli.image {
        Some(path) => {
            let image = match std::fs::read(path) {
                Ok(image) => image,
                Err(error) => {
                    eprintln!("sdb: {}: {}", path.display(), error);
                    return ExitCode::FAILURE;
                }
            };
            match Cpu::with_image(&image) {
                Ok(cpu) => {
                    info!(path = %path.display(), size = image.len(), "loaded image");
                    cpu
                }
                Err(error) => {
                    eprintln!("sdb: {}: {}", path.display(), error);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            info!("no image given, using the built-in program");
            Cpu::builtin()
        }
    };

    if cli.watchpoints == 0 {
        eprintln!("sdb: the watchpoint pool needs at least one record");
        return ExitCode::FAILURE;
    }

    sdb::term::main(Runtime::new(cpu, cli.watchpoints), cli.batch);
    ExitCode::SUCCESS
}
