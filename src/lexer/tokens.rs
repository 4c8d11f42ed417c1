use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("proc", TokenKind::Proc);
        map.insert("pub", TokenKind::Pub);
        map.insert("return", TokenKind::Return);
        map.insert("loop", TokenKind::Loop);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("if", TokenKind::If);
        map.insert("struct", TokenKind::Struct);
        map.insert("type", TokenKind::Type);
        map.insert("u8", TokenKind::U8);
        map.insert("u16", TokenKind::U16);
        map.insert("u32", TokenKind::U32);
        map.insert("u64", TokenKind::U64);
        map.insert("uptr", TokenKind::UPtr);
        map.insert("void", TokenKind::Void);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    None,
    EOF,
    Number,
    Identifier,
    InlineAsm,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    Semicolon,
    Arrow,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Proc,
    Pub,
    Return,
    Loop,
    Break,
    Continue,
    If,
    Struct,
    Type,
    U8,
    U16,
    U32,
    U64,
    UPtr,
    Void,
}

impl TokenKind {
    /// Whether the token names a built-in type.
    pub fn is_base_type(&self) -> bool {
        matches!(
            self,
            TokenKind::U8
                | TokenKind::U16
                | TokenKind::U32
                | TokenKind::U64
                | TokenKind::UPtr
                | TokenKind::Void
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    /// The source line the token starts on.
    pub fn line(&self) -> u32 {
        self.span.start.0
    }

    /// Human readable form used in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => String::from("EOF"),
            TokenKind::InlineAsm => format!("@{}", self.value),
            _ => self.value.clone(),
        }
    }
}
