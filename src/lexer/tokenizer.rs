#![forbid(unsafe_code)]

//! Character-level scanner turning source text into a [`TokenStream`]

use super::token::{Token, TokenKind, TokenStream};

/// Multi-character operators, longest first so that `?->` wins over `?`.
const OPERATORS: &[&str] = &[
    "===", "!==", "?->", "...", "->", "::", "?.", "=>", "==", "!=", "<=", ">=", "&&", "||", "++",
    "--", "<<", ">>",
];

/// Tokenize source text
///
/// Never fails: characters that fit no other class become [`TokenKind::Other`]
/// tokens. Concatenating the text of every token reproduces the input.
pub fn tokenize(text: &str) -> TokenStream {
    Tokenizer::new(text).run()
}

struct Tokenizer<'src> {
    src: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    /// Whether the last non-trivia token was a `.`, so `#name` is a
    /// private member rather than a comment
    after_dot: bool,
}

impl<'src> Tokenizer<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            after_dot: false,
        }
    }

    fn run(mut self) -> TokenStream {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek() {
            let (offset, line, column) = (self.pos, self.line, self.column);
            let kind = self.lex_token(c);
            let text = &self.src[offset..self.pos];
            if !matches!(kind, TokenKind::Whitespace | TokenKind::Comment) {
                self.after_dot = kind == TokenKind::Operator && text == ".";
            }
            tokens.push(Token {
                kind,
                text: text.to_string(),
                offset,
                line,
                column,
            });
        }

        TokenStream::new(tokens)
    }

    fn lex_token(&mut self, c: char) -> TokenKind {
        match c {
            '(' => {
                self.bump();
                TokenKind::OpenParen
            }
            ')' => {
                self.bump();
                TokenKind::CloseParen
            }
            c if c.is_whitespace() => {
                self.bump_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '/' if self.rest().starts_with("//") => {
                self.bump_while(|c| c != '\n');
                TokenKind::Comment
            }
            '#' if !self.after_dot && !self.rest().starts_with("#[") => {
                self.bump_while(|c| c != '\n');
                TokenKind::Comment
            }
            '/' if self.rest().starts_with("/*") => {
                self.lex_block_comment();
                TokenKind::Comment
            }
            '\'' | '"' | '`' => {
                self.lex_string(c);
                TokenKind::StringLiteral
            }
            c if is_ident_start(c) => {
                self.bump_while(is_ident_continue);
                TokenKind::Identifier
            }
            c if c.is_ascii_digit() => {
                self.lex_number();
                TokenKind::Other
            }
            c if c.is_ascii_punctuation() => {
                let width = OPERATORS
                    .iter()
                    .find(|op| self.rest().starts_with(**op))
                    .map_or(1, |op| op.chars().count());
                for _ in 0..width {
                    self.bump();
                }
                TokenKind::Operator
            }
            _ => {
                self.bump();
                TokenKind::Other
            }
        }
    }

    fn lex_block_comment(&mut self) {
        // Opening "/*"
        self.bump();
        self.bump();
        while self.peek().is_some() {
            if self.rest().starts_with("*/") {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }
    }

    /// Unterminated strings run to the end of input.
    fn lex_string(&mut self, quote: char) {
        self.bump();
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return;
            }
        }
    }

    fn lex_number(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    self.bump();
                }
                Some('.') if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.bump();
                }
                _ => return,
            }
        }
    }

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}
