use super::Word;
use thiserror::Error;

/// Failure to split an expression into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("no match at position {0}")]
    NoMatch(usize),
    #[error("token too long ({len} > {max}) at position {position}")]
    TokenTooLong {
        position: usize,
        len: usize,
        max: usize,
    },
    #[error("too many tokens (limit {0})")]
    TooManyTokens(usize),
}

/// Failure to evaluate a tokenized expression.
///
/// Everything except [`EvalError::Internal`] is caused by the text the
/// user typed. `Internal` means the evaluator itself broke an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("empty expression")]
    Empty,
    #[error("not a value: {0}")]
    NotAValue(String),
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("missing operand for {0}")]
    MissingOperand(String),
    #[error("missing operator")]
    MissingOperator,
    #[error("literal {0} does not fit a machine word")]
    Overflow(String),
    #[error("division by zero")]
    DivByZero,
    #[error("bad register: {0}")]
    BadRegister(#[from] LookupError),
    #[error("bad memory access: {0}")]
    BadMemoryAccess(#[from] MemoryError),
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl EvalError {
    pub fn is_internal(&self) -> bool {
        matches!(self, EvalError::Internal(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no register named ${0}")]
    UnknownRegister(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("address {addr:#010x} (width {width}) is out of bound of pmem")]
    OutOfBounds { addr: Word, width: usize },
    #[error("unsupported access width {0}")]
    BadWidth(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_converts() {
        let e: EvalError = LexError::NoMatch(3).into();
        assert_eq!(e.to_string(), "no match at position 3");
        assert!(!e.is_internal());
    }

    #[test]
    fn test_internal() {
        assert!(EvalError::Internal("p > q").is_internal());
        assert!(!EvalError::DivByZero.is_internal());
    }
}
