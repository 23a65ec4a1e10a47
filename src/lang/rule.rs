use super::token::{Operator, Token};

/// What a matched rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Whitespace,
    Hex,
    Decimal,
    Register,
    Operator(Operator),
    LParen,
    RParen,
}

impl Kind {
    /// Builds the token for `text`, or `None` for discarded input.
    pub fn token(self, text: &str) -> Option<Token> {
        use Kind::*;
        match self {
            Whitespace => None,
            Hex => Some(Token::Hex(text.to_string())),
            Decimal => Some(Token::Decimal(text.to_string())),
            Register => Some(Token::Register(text[1..].to_string())),
            Operator(op) => Some(Token::Operator(op)),
            LParen => Some(Token::LParen),
            RParen => Some(Token::RParen),
        }
    }

    /// Kinds whose text is stored and bounded by the token width limit.
    pub fn is_bounded(self) -> bool {
        matches!(self, Kind::Hex | Kind::Decimal | Kind::Register)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// One or more spaces or tabs.
    Blank,
    /// `0x` or `0X` followed by at least one hex digit.
    HexNumber,
    /// One or more decimal digits.
    DecNumber,
    /// `$` and exactly two lowercase alphanumerics, not followed by a third.
    Register,
    Exact(&'static str),
}

impl Pattern {
    /// Length of the match anchored at the start of `s`, if any.
    pub fn match_len(self, s: &str) -> Option<usize> {
        let b = s.as_bytes();
        match self {
            Pattern::Blank => nonzero(run(b, |c| c == b' ' || c == b'\t')),
            Pattern::HexNumber => {
                if b.len() < 3 || b[0] != b'0' || (b[1] != b'x' && b[1] != b'X') {
                    return None;
                }
                nonzero(run(&b[2..], |c| c.is_ascii_hexdigit())).map(|n| n + 2)
            }
            Pattern::DecNumber => nonzero(run(b, |c| c.is_ascii_digit())),
            Pattern::Register => {
                let name = |c: u8| c.is_ascii_lowercase() || c.is_ascii_digit();
                if b.len() >= 3 && b[0] == b'$' && name(b[1]) && name(b[2]) {
                    match b.get(3) {
                        Some(&c) if name(c) => None,
                        _ => Some(3),
                    }
                } else {
                    None
                }
            }
            Pattern::Exact(lit) => {
                if s.starts_with(lit) {
                    Some(lit.len())
                } else {
                    None
                }
            }
        }
    }
}

fn run(b: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    b.iter().take_while(|&&c| pred(c)).count()
}

fn nonzero(n: usize) -> Option<usize> {
    if n == 0 {
        None
    } else {
        Some(n)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub pattern: Pattern,
    pub kind: Kind,
}

const fn rule(pattern: Pattern, kind: Kind) -> Rule {
    Rule { pattern, kind }
}

/// Tokenizer rules, tried in order; the first rule matching at the current
/// position wins.
///
/// `HexNumber` must come before `DecNumber`, otherwise the `0` of `0x1f`
/// is taken as a decimal literal and `x1f` fails to lex. Two-character
/// operators have no single-character prefix among the operators, so their
/// relative order is free.
pub static RULES: &[Rule] = &[
    rule(Pattern::Blank, Kind::Whitespace),
    rule(Pattern::HexNumber, Kind::Hex),
    rule(Pattern::DecNumber, Kind::Decimal),
    rule(Pattern::Register, Kind::Register),
    rule(Pattern::Exact("=="), Kind::Operator(Operator::Equal)),
    rule(Pattern::Exact("!="), Kind::Operator(Operator::NotEqual)),
    rule(Pattern::Exact("&&"), Kind::Operator(Operator::And)),
    rule(Pattern::Exact("||"), Kind::Operator(Operator::Or)),
    rule(Pattern::Exact("+"), Kind::Operator(Operator::Plus)),
    rule(Pattern::Exact("-"), Kind::Operator(Operator::Minus)),
    rule(Pattern::Exact("*"), Kind::Operator(Operator::Multiply)),
    rule(Pattern::Exact("/"), Kind::Operator(Operator::Divide)),
    rule(Pattern::Exact("("), Kind::LParen),
    rule(Pattern::Exact(")"), Kind::RParen),
];
