/*!
# Expression Language Module

Lexical analysis and evaluation of debugger expressions such as
`*($sp + 8) == 0x80000000 && $a0`.

*/

mod error;
mod eval;
mod lex;
pub mod rule;
pub mod token;

pub use error::{EvalError, LexError, LookupError, MemoryError};
pub use eval::{eval, eval_range, DEREF_WIDTH};
pub use lex::{lex, lex_with, MAX_TOKENS, MAX_TOKEN_LEN};

#[cfg(test)]
mod tests;

/// A guest machine word.
pub type Word = u32;

/// Live machine state an expression is evaluated against.
pub trait Machine {
    fn read_memory(&self, addr: Word, width: usize) -> Result<Word, MemoryError>;
    fn resolve_register(&self, name: &str) -> Result<Word, LookupError>;
}

/// Tokenizes and evaluates `s`.
///
/// On error there is no value; callers must not fall back to zero.
pub fn expr<M: Machine + ?Sized>(s: &str, machine: &M) -> Result<Word, EvalError> {
    let tokens = lex(s)?;
    eval(&tokens, machine)
}
