/*!
## Machine Module

The guest machine and the debugger that drives it: memory, registers, a
small RV32I core, the watchpoint pool and the command runtime.

*/

mod command;
mod cpu;
mod error;
mod memory;
mod registers;
mod runtime;
mod watch;

pub use command::{Command, Info, COMMANDS};
pub use cpu::{Cpu, CpuError, Step, BUILTIN_IMAGE};
pub use error::Error;
pub use memory::{Memory, PMEM_BASE, PMEM_SIZE};
pub use registers::{Registers, NAMES};
pub use runtime::{Event, Runtime, State};
pub use watch::{
    Execution, Iter, PoolError, ScanOutcome, Watchpoint, Watchpoints, DEFAULT_CAPACITY,
};

#[cfg(test)]
mod tests;
