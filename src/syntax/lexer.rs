//! Hand-written, pull-based tokenizer.
//!
//! The lexer never fails: malformed input comes back as [`TokenKind::Invalid`]
//! tokens and it is up to the parser to turn those into syntax errors. Once
//! the input is exhausted every further call yields [`TokenKind::Eof`].

use crate::position::Position;
use crate::syntax::token::{Token, TokenKind};

pub struct Lexer<'src> {
    src: &'src str,
    pos: Position,
    // last consumed char was '\r', so a following '\n' finishes the same line break
    after_cr: bool,
    // set once the iterator has handed out EOF
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: Position::start(),
            after_cr: false,
            exhausted: false,
        }
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_blanks();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, "", start, start);
        };

        match c {
            '\n' | '\r' => self.newline(start),
            '/' if self.peek_nth(1) == Some('/') => self.comment(start),
            '"' => self.string(start),
            '+' | '-' | '0'..='9' => self.number(start),
            c if c.is_ascii_alphabetic() => self.ident(start),
            '=' => self.single(TokenKind::Assign, start),
            '{' => self.single(TokenKind::LBrace, start),
            '}' => self.single(TokenKind::RBrace, start),
            '[' => self.single(TokenKind::LBracket, start),
            ']' => self.single(TokenKind::RBracket, start),
            ',' => self.single(TokenKind::Comma, start),
            _ => self.single(TokenKind::Invalid, start),
        }
    }

    // ------------------------------------------------------------------------
    // Character cursor
    // ------------------------------------------------------------------------

    fn rest(&self) -> &'src str {
        &self.src[self.pos.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8();
        match c {
            '\n' if self.after_cr => {}
            '\n' | '\r' => {
                self.pos.line += 1;
                self.pos.column = 1;
            }
            _ => self.pos.column += 1,
        }
        self.after_cr = c == '\r';
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn slice_from(&self, start: Position) -> &'src str {
        &self.src[start.offset..self.pos.offset]
    }

    // ------------------------------------------------------------------------
    // Token scanners
    // ------------------------------------------------------------------------

    fn skip_blanks(&mut self) {
        self.bump_while(|c| c == ' ' || c == '\t');
    }

    fn single(&mut self, kind: TokenKind, start: Position) -> Token {
        self.bump();
        Token::new(kind, self.slice_from(start), start, self.pos)
    }

    /// A whitespace run holding one or more line breaks collapses into a
    /// single NEWLINE token positioned at the first break.
    fn newline(&mut self, start: Position) -> Token {
        self.bump_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
        Token::new(TokenKind::Newline, "\n", start, self.pos)
    }

    fn comment(&mut self, start: Position) -> Token {
        self.bump_while(|c| c != '\n' && c != '\r');
        Token::new(TokenKind::Comment, self.slice_from(start), start, self.pos)
    }

    fn ident(&mut self, start: Position) -> Token {
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
        Token::new(TokenKind::Ident, self.slice_from(start), start, self.pos)
    }

    fn number(&mut self, start: Position) -> Token {
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        // at least one integer digit, so "-.5" and a bare sign are invalid
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Token::new(TokenKind::Invalid, self.slice_from(start), start, self.pos);
        }
        self.bump_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let has_exponent = match self.peek_nth(1) {
                Some('+' | '-') => self.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_exponent {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.bump_while(|c| c.is_ascii_digit());
            }
        }

        let text = self.slice_from(start);
        let kind = match text.parse::<f64>() {
            Ok(value) if value.is_finite() => TokenKind::Number,
            _ => TokenKind::Invalid,
        };
        Token::new(kind, text, start, self.pos)
    }

    fn string(&mut self, start: Position) -> Token {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Token::new(TokenKind::String, value, start, self.pos),
                Some('\\') => match self.bump() {
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('n') => value.push('\n'),
                    Some(other) => value.push(other),
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        // unterminated
        Token::new(TokenKind::Invalid, value, start, self.pos)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token including the final EOF, then stops.
    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        self.exhausted = token.is(TokenKind::Eof);
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_is_a_single_line_break() {
        let mut lexer = Lexer::new("a\r\nb");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        let newline = lexer.next_token();
        assert_eq!(newline.kind, TokenKind::Newline);
        assert_eq!(newline.start, Position::new(1, 2, 1));
        let b = lexer.next_token();
        assert_eq!(b.start, Position::new(2, 1, 3));
    }

    #[test]
    fn offsets_are_bytes_columns_are_chars() {
        let mut lexer = Lexer::new("\"héllo\" x");
        let string = lexer.next_token();
        assert_eq!(string.text, "héllo");
        let x = lexer.next_token();
        assert_eq!(x.start.column, 9);
        assert_eq!(x.start.offset, 9);
    }
}
