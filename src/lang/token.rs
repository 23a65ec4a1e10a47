#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    Decimal(String),
    Hex(String),
    Register(String),
    Operator(Operator),
    LParen,
    RParen,
}

impl Token {
    /// Tokens that stand for a value on their own. A `*` following one of
    /// these is a multiplication, anywhere else it is a dereference.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Token::Decimal(_) | Token::Hex(_) | Token::Register(_) | Token::RParen
        )
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            Token::Operator(op) => Some(*op),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Decimal(s) => write!(f, "{}", s),
            Hex(s) => write!(f, "{}", s),
            Register(s) => write!(f, "${}", s),
            Operator(op) => write!(f, "{}", op),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Or,
    And,
    Equal,
    NotEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Deref,
}

impl Operator {
    /// Binding strength. The main operator of a range is the one with the
    /// lowest value.
    pub fn precedence(self) -> u8 {
        use Operator::*;
        match self {
            Or => 0,
            And => 1,
            Equal | NotEqual => 2,
            Plus | Minus => 3,
            Multiply | Divide => 4,
            Deref => 5,
        }
    }

    pub fn is_unary(self) -> bool {
        self == Operator::Deref
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Or => write!(f, "||"),
            And => write!(f, "&&"),
            Equal => write!(f, "=="),
            NotEqual => write!(f, "!="),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Multiply | Deref => write!(f, "*"),
            Divide => write!(f, "/"),
        }
    }
}
