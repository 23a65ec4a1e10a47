use super::error::EvalError;
use super::token::{Operator, Token};
use super::{Machine, Word};
use tracing::trace;

type Result<T> = std::result::Result<T, EvalError>;

/// Bytes read by a dereference.
pub const DEREF_WIDTH: usize = 4;

/// Evaluates a whole token sequence.
pub fn eval<M: Machine + ?Sized>(tokens: &[Token], machine: &M) -> Result<Word> {
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }
    eval_range(tokens, machine, 0, tokens.len() - 1)
}

/// Evaluates the inclusive token range `p..=q`.
pub fn eval_range<M: Machine + ?Sized>(
    tokens: &[Token],
    machine: &M,
    p: usize,
    q: usize,
) -> Result<Word> {
    if q >= tokens.len() {
        return Err(EvalError::Internal("range past end of tokens"));
    }
    let mut evaluator = Evaluator::new(tokens, machine);
    if p <= q {
        evaluator.check_parentheses(p, q)?;
    }
    evaluator.eval(p, q)
}

struct Evaluator<'a, M: ?Sized> {
    tokens: &'a [Token],
    // Effective operator of each token for this pass; `*` may become Deref.
    ops: Vec<Option<Operator>>,
    machine: &'a M,
}

impl<'a, M: Machine + ?Sized> Evaluator<'a, M> {
    fn new(tokens: &'a [Token], machine: &'a M) -> Evaluator<'a, M> {
        Evaluator {
            tokens,
            ops: tokens.iter().map(Token::operator).collect(),
            machine,
        }
    }

    fn eval(&mut self, p: usize, q: usize) -> Result<Word> {
        if p > q {
            return Err(EvalError::Internal("start of range exceeds its end"));
        }
        if p == q {
            return self.value(&self.tokens[p]);
        }
        if self.check_parentheses(p, q)? {
            if q == p + 1 {
                return Err(EvalError::MissingOperand("()".to_string()));
            }
            return self.eval(p + 1, q - 1);
        }
        let op_pos = self.main_operator(p, q)?;
        let op = match self.ops[op_pos] {
            Some(op) => op,
            None => return Err(EvalError::Internal("main operator is not an operator")),
        };
        trace!(p, q, op_pos, %op, "main operator");
        if op.is_unary() {
            if op_pos != p {
                return Err(EvalError::Internal("unary operator not at start of range"));
            }
            let addr = self.eval(op_pos + 1, q)?;
            return Ok(self.machine.read_memory(addr, DEREF_WIDTH)?);
        }
        if op_pos == p || op_pos == q {
            return Err(EvalError::MissingOperand(op.to_string()));
        }
        let lhs = self.eval(p, op_pos - 1)?;
        let rhs = self.eval(op_pos + 1, q)?;
        apply(op, lhs, rhs)
    }

    fn value(&self, token: &Token) -> Result<Word> {
        match token {
            Token::Decimal(s) => s.parse::<Word>().map_err(|_| EvalError::Overflow(s.clone())),
            Token::Hex(s) => {
                Word::from_str_radix(&s[2..], 16).map_err(|_| EvalError::Overflow(s.clone()))
            }
            Token::Register(name) => Ok(self.machine.resolve_register(name)?),
            other => Err(EvalError::NotAValue(other.to_string())),
        }
    }

    /// Ok(true) when `p` and `q` are a matching pair of parentheses around
    /// the whole range. Errors if the range is not balanced.
    fn check_parentheses(&self, p: usize, q: usize) -> Result<bool> {
        let mut depth: usize = 0;
        let mut first_close = None;
        for i in p..=q {
            match self.tokens[i] {
                Token::LParen => depth += 1,
                Token::RParen => {
                    if depth == 0 {
                        return Err(EvalError::UnbalancedParens);
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if depth == 0 && first_close.is_none() {
                first_close = Some(i);
            }
        }
        if depth != 0 {
            return Err(EvalError::UnbalancedParens);
        }
        Ok(self.tokens[p] == Token::LParen
            && self.tokens[q] == Token::RParen
            && first_close == Some(q))
    }

    fn closing(&self, open: usize, q: usize) -> Result<usize> {
        let mut depth = 0;
        for i in open..=q {
            match self.tokens[i] {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            }
        }
        Err(EvalError::Internal("no closing parenthesis in balanced range"))
    }

    /// Picks the operator at the root of `p..=q`: lowest precedence at
    /// depth zero, rightmost among equals. Dereference is prefix, so among
    /// several dereferences the leftmost one is the root.
    fn main_operator(&mut self, p: usize, q: usize) -> Result<usize> {
        let tokens = self.tokens;
        let mut best: Option<(usize, Operator)> = None;
        let mut i = p;
        while i < q {
            match &tokens[i] {
                Token::LParen => i = self.closing(i, q)?,
                Token::Operator(op) => {
                    let mut op = *op;
                    if op == Operator::Multiply && (i == p || !tokens[i - 1].is_value()) {
                        op = Operator::Deref;
                    }
                    self.ops[i] = Some(op);
                    let replace = match best {
                        None => true,
                        Some((_, seen)) if op.is_unary() => op.precedence() < seen.precedence(),
                        Some((_, seen)) => op.precedence() <= seen.precedence(),
                    };
                    if replace {
                        best = Some((i, op));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        match best {
            Some((pos, _)) => Ok(pos),
            None => match tokens[q].operator() {
                Some(op) => Err(EvalError::MissingOperand(op.to_string())),
                None => Err(EvalError::MissingOperator),
            },
        }
    }
}

fn apply(op: Operator, lhs: Word, rhs: Word) -> Result<Word> {
    use Operator::*;
    Ok(match op {
        Plus => lhs.wrapping_add(rhs),
        Minus => lhs.wrapping_sub(rhs),
        Multiply => lhs.wrapping_mul(rhs),
        Divide => {
            if rhs == 0 {
                return Err(EvalError::DivByZero);
            }
            lhs / rhs
        }
        Equal => (lhs == rhs) as Word,
        NotEqual => (lhs != rhs) as Word,
        And => (lhs != 0 && rhs != 0) as Word,
        Or => (lhs != 0 || rhs != 0) as Word,
        Deref => return Err(EvalError::Internal("dereference applied as binary operator")),
    })
}
