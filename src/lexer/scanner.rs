use std::str::Chars;

use crate::lexer::{Position, Symbol, Token};

/// Lazily yields the significant symbols of a source text, skipping
/// everything else. Never fails: any character outside the symbol set is
/// commentary.
pub struct Scanner<'src> {
    chars: Chars<'src>,
    line: usize,
    column: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            chars: input.chars(),
            line: 1,
            column: 1,
        }
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let pos = self.current_position();
            let ch = self.advance()?;
            if let Some(symbol) = Symbol::from_char(ch) {
                return Some(Token::new(symbol, pos));
            }
        }
    }
}

// Convenience function for filtering input
pub fn tokenize(input: &str) -> Scanner<'_> {
    Scanner::new(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_commentary() {
        let symbols: String = tokenize("a+b-c [x] .,<>!").map(|t| t.symbol.as_char()).collect();
        assert_eq!(symbols, "+-[].,<>");
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens: Vec<Token> = tokenize("+\n  ]x\n\n.").collect();
        assert_eq!(
            tokens,
            vec![
                Token::new(Symbol::Add, Position::new(1, 1)),
                Token::new(Symbol::LoopClose, Position::new(2, 3)),
                Token::new(Symbol::Output, Position::new(4, 1)),
            ]
        );
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("hello world\n").count(), 0);
    }

    #[test]
    fn multibyte_characters_count_as_one_column() {
        let tokens: Vec<Token> = tokenize("é+").collect();
        assert_eq!(tokens, vec![Token::new(Symbol::Add, Position::new(1, 2))]);
    }
}
