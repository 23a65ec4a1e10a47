use super::cpu::CpuError;
use super::watch::PoolError;
use crate::lang::{EvalError, MemoryError};
use thiserror::Error;

/// Anything a debugger command can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("expression evaluation failed: {0}")]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("program execution has ended; restart the debugger to run it again")]
    Ended,
}
