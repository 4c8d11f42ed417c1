//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that turns source text into
//! tokens for the parser. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals and punctuation
//! - Inline assembly lines introduced by `@`
//! - Line tracking for error reporting
//! - Comments and whitespace handling
//!
//! The token history buffer used for bounded lookbehind also lives here.

pub mod lexer;
pub mod tokbuf;
pub mod tokens;
