use super::error::LexError;
use super::rule::{Rule, RULES};
use super::token::Token;
use tracing::debug;

/// Most tokens a single expression may produce.
pub const MAX_TOKENS: usize = 32;
/// Longest literal or register text a token may hold.
pub const MAX_TOKEN_LEN: usize = 31;

pub fn lex(s: &str) -> Result<Vec<Token>, LexError> {
    lex_with(s, RULES, MAX_TOKENS)
}

/// Tokenizes `s` with an explicit rule table and token capacity.
pub fn lex_with(s: &str, rules: &[Rule], capacity: usize) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::with_capacity(capacity.min(MAX_TOKENS));
    for token in Lexer::new(s, rules) {
        let token = token?;
        if tokens.len() == capacity {
            return Err(LexError::TooManyTokens(capacity));
        }
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    position: usize,
    rules: &'a [Rule],
    failed: bool,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, rules: &'a [Rule]) -> Lexer<'a> {
        Lexer {
            input,
            position: 0,
            rules,
            failed: false,
        }
    }

    fn fail(&mut self, error: LexError) -> Option<Result<Token, LexError>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && self.position < self.input.len() {
            let rest = &self.input[self.position..];
            let found = self
                .rules
                .iter()
                .enumerate()
                .find_map(|(index, rule)| Some((index, rule, rule.pattern.match_len(rest)?)));
            let (index, rule, len) = match found {
                Some(m) => m,
                None => return self.fail(LexError::NoMatch(self.position)),
            };
            let text = &rest[..len];
            debug!(
                rule = index,
                position = self.position,
                len,
                text,
                "match rules[{}] = {:?}",
                index,
                rule.pattern
            );
            if rule.kind.is_bounded() && len > MAX_TOKEN_LEN {
                let position = self.position;
                return self.fail(LexError::TokenTooLong {
                    position,
                    len,
                    max: MAX_TOKEN_LEN,
                });
            }
            self.position += len;
            if let Some(token) = rule.kind.token(text) {
                return Some(Ok(token));
            }
        }
        None
    }
}
