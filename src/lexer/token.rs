#![forbid(unsafe_code)]

//! Tokens and the per-file token stream

/// Token kinds produced by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier or keyword (`console`, `print_r`, `$x`)
    Identifier,
    /// Operator or punctuation (`.`, `->`, `::`, `;`)
    Operator,
    /// Run of whitespace, newlines included
    Whitespace,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// Quoted string, quotes included
    StringLiteral,
    /// `// ...` or `/* ... */`
    Comment,
    /// Numbers and anything unrecognized
    Other,
}

/// Kinds that never take part in a call shape.
pub const TRIVIA: &[TokenKind] = &[TokenKind::Whitespace, TokenKind::Comment];

/// A single token with its kind, literal text, and source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,

    /// Literal text as it appears in the source
    pub text: String,

    /// Byte offset of the first character
    pub offset: usize,

    /// Line number (1-indexed)
    pub line: u32,

    /// Column number in characters (1-indexed)
    pub column: u32,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Ordered tokens for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Index of the nearest token strictly after `index` whose kind is not
    /// in `skip`. Returns `None` when the end of the stream is reached.
    pub fn next_significant(&self, index: usize, skip: &[TokenKind]) -> Option<usize> {
        let start = index.checked_add(1)?;
        (start..self.tokens.len()).find(|&i| !skip.contains(&self.tokens[i].kind))
    }

    /// Index of the nearest token strictly before `index` whose kind is not
    /// in `skip`. Returns `None` when the start of the stream is reached.
    pub fn prev_significant(&self, index: usize, skip: &[TokenKind]) -> Option<usize> {
        let end = index.min(self.tokens.len());
        (0..end)
            .rev()
            .find(|&i| !skip.contains(&self.tokens[i].kind))
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &str, offset: usize) -> Token {
        Token {
            kind,
            text: text.to_string(),
            offset,
            line: 1,
            column: offset as u32 + 1,
        }
    }

    fn sample() -> TokenStream {
        // "a . /*x*/ b"
        TokenStream::new(vec![
            tok(TokenKind::Identifier, "a", 0),
            tok(TokenKind::Whitespace, " ", 1),
            tok(TokenKind::Operator, ".", 2),
            tok(TokenKind::Whitespace, " ", 3),
            tok(TokenKind::Comment, "/*x*/", 4),
            tok(TokenKind::Whitespace, " ", 9),
            tok(TokenKind::Identifier, "b", 10),
        ])
    }

    #[test]
    fn test_next_significant_skips_trivia() {
        let stream = sample();
        assert_eq!(stream.next_significant(2, TRIVIA), Some(6));
        assert_eq!(stream.next_significant(0, TRIVIA), Some(2));
    }

    #[test]
    fn test_next_significant_only_whitespace_skip_stops_at_comment() {
        let stream = sample();
        assert_eq!(stream.next_significant(2, &[TokenKind::Whitespace]), Some(4));
    }

    #[test]
    fn test_prev_significant_skips_trivia() {
        let stream = sample();
        assert_eq!(stream.prev_significant(6, TRIVIA), Some(2));
        assert_eq!(stream.prev_significant(2, TRIVIA), Some(0));
    }

    #[test]
    fn test_boundaries() {
        let stream = sample();
        assert_eq!(stream.next_significant(6, TRIVIA), None);
        assert_eq!(stream.next_significant(100, TRIVIA), None);
        assert_eq!(stream.next_significant(usize::MAX, TRIVIA), None);
        assert_eq!(stream.prev_significant(0, TRIVIA), None);
        assert_eq!(stream.prev_significant(100, TRIVIA), Some(6));
    }

    #[test]
    fn test_empty_stream() {
        let stream = TokenStream::default();
        assert!(stream.is_empty());
        assert_eq!(stream.next_significant(0, TRIVIA), None);
        assert_eq!(stream.prev_significant(0, TRIVIA), None);
    }
}
