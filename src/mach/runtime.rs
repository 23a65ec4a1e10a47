use super::command::{Command, Info, COMMANDS};
use super::cpu::{Cpu, Step};
use super::watch::{Execution, ScanOutcome, Watchpoints, DEFAULT_CAPACITY};
use super::Error;
use crate::lang::{self, Word};
use std::collections::VecDeque;
use tracing::{info, warn};

type Result<T> = std::result::Result<T, Error>;

/// What the front-end should do next.
#[derive(Debug)]
pub enum Event {
    /// Waiting for a command.
    Stopped,
    /// Still executing; call `execute` again.
    Running,
    Print(String),
    Error(Error),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Stopped,
    Running,
    Ended { pc: Word, code: Word },
    Aborted { pc: Word },
    Quit,
}

/// Execution bookkeeping, kept apart from the CPU so a watchpoint check can
/// borrow the machine and the controller at once.
struct Control {
    state: State,
    remaining: Option<u64>,
}

impl Execution for Control {
    fn step_execution(&mut self, count: i64) {
        self.remaining = if count < 0 { None } else { Some(count as u64) };
        self.state = State::Running;
    }

    fn signal_stop(&mut self) {
        if self.state == State::Running {
            self.state = State::Stopped;
        }
    }
}

/// ## Debugger runtime
///
/// Commands go in through `enter`; `execute` runs the machine in bounded
/// slices and hands back one `Event` at a time.
pub struct Runtime {
    cpu: Cpu,
    watchpoints: Watchpoints,
    control: Control,
    events: VecDeque<Event>,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(Cpu::builtin(), DEFAULT_CAPACITY)
    }
}

impl Runtime {
    pub fn new(cpu: Cpu, watchpoints: usize) -> Runtime {
        Runtime {
            cpu,
            watchpoints: Watchpoints::new(watchpoints),
            control: Control {
                state: State::Stopped,
                remaining: None,
            },
            events: VecDeque::new(),
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn watchpoints(&self) -> &Watchpoints {
        &self.watchpoints
    }

    pub fn state(&self) -> State {
        self.control.state
    }

    /// Runs one command line. Returns true when the line was not blank, so
    /// the caller knows whether to keep it in history.
    pub fn enter(&mut self, line: &str) -> bool {
        let result = match Command::parse(line) {
            Ok(None) => return false,
            Ok(Some(command)) => self.command(command),
            Err(error) => Err(error),
        };
        if let Err(error) = result {
            warn!(%error, line, "command failed");
            self.events.push_back(Event::Error(error));
        }
        true
    }

    /// Stops a running program at the next instruction boundary.
    pub fn interrupt(&mut self) {
        if self.control.state == State::Running {
            self.control.signal_stop();
            self.print(format!("Interrupted at pc = {:#010x}", self.cpu.pc()));
        }
    }

    /// Executes at most `cycles` instructions, then reports.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = self.events.pop_front() {
            return event;
        }
        match self.control.state {
            State::Running => {}
            State::Quit => return Event::Quit,
            _ => return Event::Stopped,
        }
        for _ in 0..cycles {
            if self.control.remaining == Some(0) {
                self.control.signal_stop();
                break;
            }
            self.step();
            if self.control.state != State::Running {
                break;
            }
        }
        match self.events.pop_front() {
            Some(event) => event,
            None if self.control.state == State::Running => Event::Running,
            None => Event::Stopped,
        }
    }

    fn step(&mut self) {
        let pc = self.cpu.pc();
        match self.cpu.step() {
            Ok(Step::Next) => {}
            Ok(Step::Halt(code)) => {
                self.control.state = State::Ended { pc, code };
                let trap = if code == 0 { "HIT GOOD TRAP" } else { "HIT BAD TRAP" };
                info!(pc, code, "program ended");
                self.print(format!("{} at pc = {:#010x}", trap, pc));
                return;
            }
            Err(error) => {
                self.control.state = State::Aborted { pc };
                warn!(%error, "program aborted");
                self.events.push_back(Event::Error(error.into()));
                return;
            }
        }
        if let Some(n) = self.control.remaining.as_mut() {
            *n -= 1;
        }
        match self.watchpoints.check(&self.cpu, &mut self.control) {
            Ok(ScanOutcome::Unchanged) => {}
            Ok(ScanOutcome::Changed { id, old, new }) => {
                let expr = self.watchpoints.get(id).map(|wp| wp.expr()).unwrap_or("");
                let message = format!(
                    "Hardware watchpoint {}: {}\n\nOld value = {:#010x}\nNew value = {:#010x}",
                    id, expr, old, new
                );
                self.print(message);
            }
            Err(error) => self.events.push_back(Event::Error(error.into())),
        }
    }

    fn command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Help(None) => {
                let list: Vec<String> = COMMANDS
                    .iter()
                    .map(|(name, help)| format!("{} - {}", name, help))
                    .collect();
                self.print(list.join("\n"));
            }
            Command::Help(Some(name)) => match Command::help(&name) {
                Some(help) => self.print(format!("{} - {}", name, help)),
                None => return Err(Error::UnknownCommand(name)),
            },
            Command::Continue => self.run(-1)?,
            Command::Step(n) => self.run(n)?,
            Command::Quit => self.control.state = State::Quit,
            Command::Info(Info::Registers) => self.print(self.cpu.registers().to_string()),
            Command::Info(Info::Watchpoints) => {
                let mut s = String::from("Num     What");
                for (id, expr) in self.watchpoints.enumerate() {
                    s.push_str(&format!("\n{:<8}{}", id, expr));
                }
                self.print(s);
            }
            Command::Examine { count, expr } => {
                let addr = lang::expr(&expr, &self.cpu)?;
                self.print(self.examine(addr, count)?);
            }
            Command::Print(expr) => {
                let value = lang::expr(&expr, &self.cpu)?;
                self.print(format!("{:#010x}  {}", value, value));
            }
            Command::Watch(expr) => {
                let value = lang::expr(&expr, &self.cpu)?;
                let wp = self.watchpoints.allocate()?;
                wp.set_expr(expr);
                wp.set_last_value(value);
                let message = format!("Hardware watchpoint {}: {}", wp.id(), wp.expr());
                self.print(message);
            }
            Command::Delete(id) => {
                self.watchpoints.release(id)?;
                self.print(format!("Deleted watchpoint {}", id));
            }
        }
        Ok(())
    }

    fn run(&mut self, count: i64) -> Result<()> {
        match self.control.state {
            State::Ended { .. } | State::Aborted { .. } => Err(Error::Ended),
            _ => {
                info!(count, pc = self.cpu.pc(), "execute");
                self.control.step_execution(count);
                Ok(())
            }
        }
    }

    fn examine(&self, addr: Word, count: usize) -> Result<String> {
        let mut s = String::new();
        for i in 0..count {
            let at = addr.wrapping_add(4 * i as Word);
            if i % 4 == 0 {
                if i > 0 {
                    s.push('\n');
                }
                s.push_str(&format!("{:#010x}:", at));
            }
            let word = self.cpu.memory().read(at, 4)?;
            s.push_str(&format!(" {:#010x}", word));
        }
        Ok(s)
    }

    fn print(&mut self, s: String) {
        self.events.push_back(Event::Print(s));
    }
}
