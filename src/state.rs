//! Per-unit compiler state shared by the parser and the code generator.

use std::rc::Rc;

use crate::{
    ast::ast::AstArena,
    lexer::tokbuf::TokenBuffer,
    symbols::{scope::ScopeStack, symbol::{SymbolId, SymbolTable}},
    Position,
};

/// Everything one compilation unit owns. A fresh state is created per input file.
pub struct CompilerState {
    pub file: Rc<String>,
    pub tbuf: TokenBuffer,
    pub symtab: SymbolTable,
    pub scopes: ScopeStack,
    pub arena: AstArena,
    /// Procedure whose body is currently open.
    pub current_proc: Option<SymbolId>,
    /// Set by `return`, cleared by the next block close.
    pub unreachable: bool,
    pub line: u32,
}

impl CompilerState {
    pub fn new(file: Rc<String>) -> Self {
        CompilerState {
            file,
            tbuf: TokenBuffer::new(),
            symtab: SymbolTable::new(),
            scopes: ScopeStack::new(),
            arena: AstArena::new(),
            current_proc: None,
            unreachable: false,
            line: 1,
        }
    }

    pub fn position(&self) -> Position {
        Position(self.line, Rc::clone(&self.file))
    }
}
