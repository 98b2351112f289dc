//! blockconf Parser - recursive descent over the lexer's token stream
//!
//! Converts source text into an AST [`Block`] with position tracking. The
//! parser keeps exactly one token of lookahead, skips comments, and aborts on
//! the first unexpected token.
//!
//! ```text
//! root    := entries EOF
//! entries := (newline* entry)*
//! entry   := IDENT (ASSIGN value | block)
//! block   := LBRACE entries newline* RBRACE
//! value   := NUMBER | STRING | bool | list
//! list    := LBRACKET newline* (value newline* (COMMA newline* value newline*)* (COMMA newline*)?)? RBRACKET
//! ```

use crate::ast::{Block, Bool, Entry, Ident, List, Number, Str, Value};
use crate::errors::{SyntaxError, SyntaxErrorKind};
use crate::options::Options;
use crate::position::Position;
use crate::syntax::lexer::Lexer;
use crate::syntax::token::{Token, TokenKind};

type ParseResult<T> = Result<T, SyntaxError>;

pub struct Parser<'src> {
    src: &'src str,
    lexer: Lexer<'src>,
    current: Token,
    depth: usize,
    options: Options,
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str, options: Options) -> Self {
        let mut lexer = Lexer::new(src);
        let current = next_significant(&mut lexer);
        Self {
            src,
            lexer,
            current,
            depth: 0,
            options,
        }
    }

    /// Parse the whole input as the implicit root block.
    pub fn parse_document(mut self) -> ParseResult<Block> {
        let entries = self.entries()?;
        if !self.current.is(TokenKind::Eof) {
            return Err(self.unexpected("an entry name or end of input"));
        }
        Ok(Block::new(Position::start(), entries))
    }

    // ========================================================================
    // GRAMMAR RULES
    // ========================================================================

    fn entries(&mut self) -> ParseResult<Vec<Entry>> {
        let mut entries = Vec::new();
        loop {
            self.skip_newlines();
            if !self.current.is(TokenKind::Ident) {
                return Ok(entries);
            }
            entries.push(self.entry()?);
        }
    }

    fn entry(&mut self) -> ParseResult<Entry> {
        let name = self.ident();
        let value = match self.current.kind {
            TokenKind::Assign => {
                self.advance();
                self.value()?
            }
            TokenKind::LBrace => Value::Block(self.block()?),
            _ => return Err(self.unexpected("'=' or '{'")),
        };
        Ok(Entry {
            start: name.start,
            name,
            value,
        })
    }

    fn block(&mut self) -> ParseResult<Block> {
        self.enter()?;
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let entries = self.entries()?;
        self.expect(TokenKind::RBrace, "'}' or an entry name")?;
        self.leave();
        Ok(Block::new(open.start, entries))
    }

    fn value(&mut self) -> ParseResult<Value> {
        match self.current.kind {
            TokenKind::Number => self.number(),
            TokenKind::String => Ok(Value::String(self.string())),
            TokenKind::Ident if matches!(self.current.text.as_str(), "true" | "false") => {
                Ok(Value::Bool(self.bool()))
            }
            TokenKind::LBracket => Ok(Value::List(self.list()?)),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn list(&mut self) -> ParseResult<List> {
        self.enter()?;
        let open = self.expect(TokenKind::LBracket, "'['")?;
        let mut values = Vec::new();

        self.skip_newlines();
        if !self.current.is(TokenKind::RBracket) {
            loop {
                values.push(self.value()?);
                self.skip_newlines();
                if !self.current.is(TokenKind::Comma) {
                    break;
                }
                self.advance();
                self.skip_newlines();
                if self.current.is(TokenKind::RBracket) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RBracket, "',' or ']'")?;
        self.leave();
        Ok(List {
            start: open.start,
            values,
        })
    }

    // ========================================================================
    // TERMINAL READERS
    // ========================================================================
    //
    // Only called after the caller has checked the lookahead kind.

    fn ident(&mut self) -> Ident {
        debug_assert!(self.current.is(TokenKind::Ident));
        let token = self.advance();
        Ident {
            start: token.start,
            text: token.text,
        }
    }

    fn number(&mut self) -> ParseResult<Value> {
        debug_assert!(self.current.is(TokenKind::Number));
        let token = self.advance();
        match token.text.parse::<f64>() {
            Ok(value) => Ok(Value::Number(Number {
                start: token.start,
                value,
            })),
            Err(_) => Err(SyntaxError::new(SyntaxErrorKind::InvalidNumber, token)),
        }
    }

    fn string(&mut self) -> Str {
        debug_assert!(self.current.is(TokenKind::String));
        let token = self.advance();
        Str {
            start: token.start,
            value: token.text,
        }
    }

    fn bool(&mut self) -> Bool {
        debug_assert!(self.current.is(TokenKind::Ident));
        let token = self.advance();
        Bool {
            start: token.start,
            value: token.text == "true",
        }
    }

    // ========================================================================
    // TOKEN STREAM HELPERS
    // ========================================================================

    /// Move to the next non-comment token, returning the one just left.
    fn advance(&mut self) -> Token {
        let next = next_significant(&mut self.lexer);
        std::mem::replace(&mut self.current, next)
    }

    fn skip_newlines(&mut self) {
        while self.current.is(TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> ParseResult<Token> {
        if self.current.is(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= self.options.max_depth {
            return Err(SyntaxError::new(
                SyntaxErrorKind::NestingTooDeep {
                    limit: self.options.max_depth,
                },
                self.current.clone(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn unexpected(&self, expected: &'static str) -> SyntaxError {
        let kind = match self.current.kind {
            TokenKind::Invalid => self.classify_invalid(),
            _ => SyntaxErrorKind::UnexpectedToken { expected },
        };
        SyntaxError::new(kind, self.current.clone())
    }

    fn classify_invalid(&self) -> SyntaxErrorKind {
        let raw = self.src.get(self.current.start.offset..).unwrap_or_default();
        match raw.chars().next() {
            Some('"') => SyntaxErrorKind::UnterminatedString,
            Some('+' | '-' | '0'..='9') => SyntaxErrorKind::InvalidNumber,
            _ => SyntaxErrorKind::InvalidToken,
        }
    }
}

fn next_significant(lexer: &mut Lexer<'_>) -> Token {
    loop {
        let token = lexer.next_token();
        if !token.is(TokenKind::Comment) {
            return token;
        }
    }
}
