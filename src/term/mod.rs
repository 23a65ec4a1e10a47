extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::mach::{Event, Runtime};
use ansi_term::{Colour, Style};
use linefeed::{Interface, ReadResult};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::error;

/// Instructions run between checks for Ctrl-C.
const CYCLES: usize = 5000;

pub fn main(runtime: Runtime, batch: bool) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        error!(%error, "cannot install Ctrl-C handler");
    }
    let result = if batch {
        batch_loop(runtime, &interrupted, &mut std::io::stdout())
    } else {
        main_loop(runtime, interrupted)
    };
    if let Err(error) = result {
        eprintln!("{}", error);
    }
}

fn main_loop(mut runtime: Runtime, interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let command = Interface::new("sdb")?;
    command.set_prompt("(sdb) ")?;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        };
        match runtime.execute(CYCLES) {
            Event::Stopped => {
                let string = match command.read_line()? {
                    ReadResult::Input(string) => string,
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
                if runtime.enter(&string) {
                    command.add_history_unique(string);
                }
            }
            Event::Running => {}
            Event::Print(s) => {
                command.write_fmt(format_args!("{}\n", s))?;
            }
            Event::Error(error) => {
                command.write_fmt(format_args!(
                    "{}\n",
                    Style::new().bold().paint(error.to_string())
                ))?;
            }
            Event::Quit => break,
        }
    }
    Ok(())
}

/// Runs the program to the end without a prompt. Ctrl-C stops it at the
/// next instruction boundary.
fn batch_loop<W: Write>(
    mut runtime: Runtime,
    interrupted: &AtomicBool,
    out: &mut W,
) -> std::io::Result<()> {
    runtime.enter("c");
    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(CYCLES) {
            Event::Running => {}
            Event::Print(s) => writeln!(out, "{}", s)?,
            Event::Error(error) => {
                eprintln!("{}", Colour::Red.bold().paint(error.to_string()));
            }
            Event::Stopped | Event::Quit => break,
        }
    }
    Ok(())
}
