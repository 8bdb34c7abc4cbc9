use std::fmt;

/// Position in source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The eight significant symbols of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    MoveLeft,  // <
    MoveRight, // >
    Add,       // +
    Subtract,  // -
    Input,     // ,
    Output,    // .
    LoopOpen,  // [
    LoopClose, // ]
}

impl Symbol {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '<' => Some(Symbol::MoveLeft),
            '>' => Some(Symbol::MoveRight),
            '+' => Some(Symbol::Add),
            '-' => Some(Symbol::Subtract),
            ',' => Some(Symbol::Input),
            '.' => Some(Symbol::Output),
            '[' => Some(Symbol::LoopOpen),
            ']' => Some(Symbol::LoopClose),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::MoveLeft => '<',
            Symbol::MoveRight => '>',
            Symbol::Add => '+',
            Symbol::Subtract => '-',
            Symbol::Input => ',',
            Symbol::Output => '.',
            Symbol::LoopOpen => '[',
            Symbol::LoopClose => ']',
        }
    }

    /// Whether consecutive occurrences collapse into one counted instruction.
    /// Input and output have per-occurrence effects and never merge.
    pub fn is_repeatable(self) -> bool {
        matches!(
            self,
            Symbol::MoveLeft | Symbol::MoveRight | Symbol::Add | Symbol::Subtract
        )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A significant symbol together with where it was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: Symbol,
    pub pos: Position,
}

impl Token {
    pub fn new(symbol: Symbol, pos: Position) -> Self {
        Self { symbol, pos }
    }
}
