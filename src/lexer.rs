#![forbid(unsafe_code)]

//! Lexical-recovery tokenizer
//!
//! Produces just enough structure (token kind, text, position) for the
//! construct scanner to recognize call-shaped sequences. Syntax validity is
//! the syntax validator's job; the tokenizer never fails.

mod token;
mod tokenizer;

pub use token::{Token, TokenKind, TokenStream, TRIVIA};
pub use tokenizer::tokenize;
