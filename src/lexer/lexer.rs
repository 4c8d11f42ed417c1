use std::{collections::VecDeque, rc::Rc};

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Called with the text a pattern matched at the current position.
pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(&format!("^(?:{})", source)).expect("lexer patterns are valid regexes"),
        handler,
    }
}

lazy_static! {
    // First match wins, so longer punctuators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("\\s+", skip_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("@[^\\n]*", inline_asm_handler),
        pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("[0-9]+", number_handler),
        pattern("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern("->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
    ];
}

/// Pull-based scanner. Tokens are produced one at a time through [`Lexer::scan`].
pub struct Lexer {
    tokens: VecDeque<Token>,
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Rc<String>) -> Lexer {
        Lexer {
            tokens: VecDeque::new(),
            source,
            pos: 0,
            line: 1,
            file,
        }
    }

    /// Moves past `n` bytes of input, counting the newlines crossed.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        let newlines = self.source[self.pos..end].matches('\n').count();
        self.line += newlines as u32;
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.line, Rc::clone(&self.file))
    }

    /// Span of a token starting at the cursor. Tokens never cross a line.
    pub fn span(&self) -> Span {
        Span {
            start: self.position(),
            end: self.position(),
        }
    }

    /// Scans the next token. Once the input is exhausted every call yields an `EOF` token.
    pub fn scan(&mut self) -> Result<Token, Error> {
        while self.tokens.is_empty() && !self.at_eof() {
            self.step()?;
        }

        match self.tokens.pop_front() {
            Some(token) => {
                trace!("scanned {} {:?} on line {}", token.kind, token.value, token.line());
                Ok(token)
            }
            None => Ok(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.span())),
        }
    }

    fn step(&mut self) -> Result<(), Error> {
        let found = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(self.remainder())
                .map(|matched| (pattern.handler, matched.as_str().to_string()))
        });

        match found {
            Some((handler, matched)) => {
                handler(self, &matched);
                Ok(())
            }
            None => {
                let token = self.remainder().chars().next().map(String::from).unwrap_or_default();
                Err(Error::new(ErrorImpl::UnrecognisedToken { token }, self.position()))
            }
        }
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span();
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.advance_n(matched.len());
}

fn inline_asm_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span();
    let line = matched[1..].trim().to_string();
    lexer.push(MK_TOKEN!(TokenKind::InlineAsm, line, span));
    lexer.advance_n(matched.len());
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let span = lexer.span();
    let kind = RESERVED_LOOKUP.get(matched).copied().unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, matched.to_string(), span));
    lexer.advance_n(matched.len());
}

/// Lexes a whole source into a vector terminated by an `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let file_name = Rc::new(file.unwrap_or_else(|| String::from("shell")));
    let mut lex = Lexer::new(source, file_name);
    let mut tokens = vec![];

    loop {
        let token = lex.scan()?;
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);

        if done {
            return Ok(tokens);
        }
    }
}
