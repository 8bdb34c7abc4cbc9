use thiserror::Error;
use crate::lexer::Position;

/// Parser error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Program contains no commands")]
    EmptyProgram,

    #[error("Unmatched '[' at {0}")]
    UnmatchedOpen(Position),

    #[error("Unmatched ']' at {0}")]
    UnmatchedClose(Position),
}
