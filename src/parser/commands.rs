use std::iter::Peekable;
use std::mem;

use crate::lexer::{tokenize, Position, Scanner, Symbol, Token};
use crate::parser::{Command, Loop, ParserError, Primitive, Program};

/// Builds a [`Program`] from source text.
///
/// Loops are tracked with an explicit stack of open brackets rather than by
/// recursion, so parsing itself does not grow the call stack with nesting
/// depth. Code generation and the AST's `Display` impls still recurse once
/// per loop level.
pub struct Parser<'src> {
    tokens: Peekable<Scanner<'src>>,
}

impl<'src> Parser<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            tokens: tokenize(source).peekable(),
        }
    }

    /// Advance to next token
    fn advance(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// Consume a token if it carries the given symbol
    fn match_symbol(&mut self, symbol: Symbol) -> bool {
        self.tokens.next_if(|token| token.symbol == symbol).is_some()
    }

    /// Length of the run started by an already consumed `symbol`
    fn run_length(&mut self, symbol: Symbol) -> usize {
        let mut count = 1;
        while self.match_symbol(symbol) {
            count += 1;
        }
        count
    }

    /// Parse the whole input. Fails without returning a partial program.
    pub fn parse_program(&mut self) -> Result<Program, ParserError> {
        // Commands of every enclosing loop, paired with its '[' position
        let mut open: Vec<(Position, Vec<Command>)> = Vec::new();
        let mut commands = Vec::new();

        while let Some(token) = self.advance() {
            let count = if token.symbol.is_repeatable() {
                self.run_length(token.symbol)
            } else {
                1
            };
            let primitive = match token.symbol {
                Symbol::LoopOpen => {
                    open.push((token.pos, mem::take(&mut commands)));
                    continue;
                }
                Symbol::LoopClose => {
                    let (_, outer) = open
                        .pop()
                        .ok_or(ParserError::UnmatchedClose(token.pos))?;
                    let body = mem::replace(&mut commands, outer);
                    commands.push(Loop::new(body).into());
                    continue;
                }
                Symbol::MoveLeft => Primitive::MoveLeft(count),
                Symbol::MoveRight => Primitive::MoveRight(count),
                Symbol::Add => Primitive::Add(count),
                Symbol::Subtract => Primitive::Subtract(count),
                Symbol::Input => Primitive::Input,
                Symbol::Output => Primitive::Output,
            };
            commands.push(primitive.into());
        }

        if let Some((pos, _)) = open.last() {
            return Err(ParserError::UnmatchedOpen(*pos));
        }
        if commands.is_empty() {
            return Err(ParserError::EmptyProgram);
        }

        Ok(Program::new(commands))
    }
}

// Convenience function for parsing source text
pub fn parse(source: &str) -> Result<Program, ParserError> {
    Parser::new(source).parse_program()
}
