//! Parser implementation.
//!
//! The parser owns the lexer, the per-unit [`CompilerState`] and the code
//! generator. It runs a single loop: look at the current token, dispatch to
//! the statement handler registered for its kind, and hand any finished
//! subtree to the generator before moving on. No whole-program tree is kept.

use std::{collections::HashMap, io::Write, rc::Rc};

use log::debug;

use crate::{
    ast::ast::{Node, NodeId},
    compiler::compiler::CodeGen,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    state::CompilerState,
    Position, Span, MK_TOKEN,
};

use super::lookups::{create_token_lookups, StmtHandler, StmtLookup};

/// The main parser structure that maintains parsing state.
pub struct Parser<W: Write> {
    lexer: Lexer,
    /// Lookahead token, already recorded in the token history
    current: Token,
    /// Symbols, scopes, nodes and flags for this unit
    pub state: CompilerState,
    pub codegen: CodeGen<W>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup<W>,
}

impl<W: Write> Parser<W> {
    /// Creates a parser over `source` writing assembly to `out`.
    pub fn new(source: String, file: Rc<String>, out: W) -> Self {
        let position = Position(1, Rc::clone(&file));
        let mut parser = Parser {
            lexer: Lexer::new(source, Rc::clone(&file)),
            current: MK_TOKEN!(
                TokenKind::None,
                String::new(),
                Span {
                    start: position.clone(),
                    end: position
                }
            ),
            state: CompilerState::new(file),
            codegen: CodeGen::new(out),
            stmt_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Result<Token, Error> {
        let next = self.lexer.scan()?;
        self.state.line = next.line();
        self.state.tbuf.push(next.clone());
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Expects the current token to be of `expected_kind` and consumes it.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current.kind == expected_kind {
            return self.advance();
        }

        Err(self.unexpected(&expected_kind.to_string()))
    }

    /// Error for the current token when `expected` was wanted.
    pub fn unexpected(&self, expected: &str) -> Error {
        if self.current.kind == TokenKind::EOF {
            return self.error(ErrorImpl::UnexpectedEof);
        }

        self.error(ErrorImpl::ExpectedToken {
            expected: expected.to_string(),
            received: self.current.describe(),
        })
    }

    pub fn error(&self, error_impl: ErrorImpl) -> Error {
        Error::new(error_impl, self.get_position())
    }

    /// Whether the token `n` steps behind the current one has kind `kind`.
    pub fn lookbehind_is(&self, n: usize, kind: TokenKind) -> bool {
        self.state
            .tbuf
            .lookbehind(n)
            .is_some_and(|token| token.kind == kind)
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.state.arena.alloc(node)
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler<W>) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.state.position()
    }

    /// Parses the whole input, generating code for each finished subtree as it goes.
    pub fn parse(&mut self) -> Result<(), Error> {
        if self.current.kind == TokenKind::None {
            self.advance()?;
        }

        while self.current.kind != TokenKind::EOF {
            let kind = self.current.kind;
            let Some(handler) = self.stmt_lookup.get(&kind).copied() else {
                return Err(self.error(ErrorImpl::UnexpectedToken {
                    token: self.current.describe(),
                }));
            };

            if let Some(node) = handler(self)? {
                self.codegen.compile_node(&self.state, node)?;
            }
        }

        if self.state.scopes.depth() > 0 {
            return Err(self.error(ErrorImpl::UnexpectedEof));
        }

        debug!(
            "parsed {} with {} symbols and {} nodes",
            self.state.file,
            self.state.symtab.len(),
            self.state.arena.len()
        );
        self.codegen.flush(&self.state)
    }

    pub fn into_output(self) -> W {
        self.codegen.into_inner()
    }
}

/// Compiles `source` into assembly written to `out`.
///
/// Text generated before an error is left in `out`.
pub fn parse<W: Write>(source: String, file: Rc<String>, out: W) -> Result<(), Error> {
    let mut parser = Parser::new(source, file, out);
    parser.parse()
}
