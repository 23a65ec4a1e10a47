use super::Error;

type Result<T> = std::result::Result<T, Error>;

/// Command names and their help lines, in the order `help` lists them.
pub const COMMANDS: [(&str, &str); 9] = [
    ("help", "Display information about all supported commands"),
    ("c", "Continue the execution of the program"),
    ("q", "Exit the debugger"),
    ("si", "Step N instructions, one if N is omitted: si [N]"),
    ("info", "Print registers or watchpoints: info r | info w"),
    ("x", "Print N words of memory starting at EXPR: x N EXPR"),
    ("p", "Evaluate an expression: p EXPR"),
    ("w", "Stop when the value of EXPR changes: w EXPR"),
    ("d", "Delete watchpoint N: d N"),
];

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Help(Option<String>),
    Continue,
    Quit,
    Step(i64),
    Info(Info),
    Examine { count: usize, expr: String },
    Print(String),
    Watch(String),
    Delete(usize),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Info {
    Registers,
    Watchpoints,
}

impl Command {
    /// Parses one line of input. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        let (name, args) = match line.find(char::is_whitespace) {
            Some(i) => (&line[..i], line[i..].trim()),
            None => (line, ""),
        };
        if name.is_empty() {
            return Ok(None);
        }
        let args = if args.is_empty() { None } else { Some(args) };
        let command = match name {
            "help" => Command::Help(args.and_then(|a| a.split_whitespace().next()).map(String::from)),
            "c" => Command::Continue,
            "q" => Command::Quit,
            "si" => match args {
                None => Command::Step(1),
                Some(n) => Command::Step(count(n).ok_or(Error::Usage("si [N], N > 0"))?),
            },
            "info" => match args {
                Some("r") => Command::Info(Info::Registers),
                Some("w") => Command::Info(Info::Watchpoints),
                _ => return Err(Error::Usage("info r | info w")),
            },
            "x" => {
                let usage = Error::Usage("x N EXPR");
                let args = match args {
                    Some(args) => args,
                    None => return Err(usage),
                };
                let (n, expr) = match args.find(char::is_whitespace) {
                    Some(i) => (&args[..i], args[i..].trim()),
                    None => return Err(usage),
                };
                match count(n) {
                    Some(n) => Command::Examine {
                        count: n as usize,
                        expr: expr.to_string(),
                    },
                    None => return Err(usage),
                }
            }
            "p" => Command::Print(args.ok_or(Error::Usage("p EXPR"))?.to_string()),
            "w" => Command::Watch(args.ok_or(Error::Usage("w EXPR"))?.to_string()),
            "d" => match args.and_then(|a| a.parse().ok()) {
                Some(id) => Command::Delete(id),
                None => return Err(Error::Usage("d N")),
            },
            other => return Err(Error::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    pub fn help(name: &str) -> Option<&'static str> {
        COMMANDS.iter().find(|(n, _)| *n == name).map(|(_, h)| *h)
    }
}

fn count(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|&n| n > 0)
}
