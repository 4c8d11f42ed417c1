use std::{collections::HashMap, io::Write};

use crate::{ast::ast::NodeId, errors::errors::Error, lexer::tokens::TokenKind};

use super::{parser::Parser, stmt::*};

/// A statement rule. Returns the finished subtree to generate, if the rule produced one.
pub type StmtHandler<W> = fn(&mut Parser<W>) -> Result<Option<NodeId>, Error>;

pub fn create_token_lookups<W: Write>(parser: &mut Parser<W>) {
    // Declarations
    parser.stmt(TokenKind::Pub, parse_pub_stmt);
    parser.stmt(TokenKind::Proc, parse_proc_decl_stmt);
    parser.stmt(TokenKind::Struct, parse_struct_decl_stmt);
    parser.stmt(TokenKind::Type, parse_typedef_stmt);
    for kind in [
        TokenKind::U8,
        TokenKind::U16,
        TokenKind::U32,
        TokenKind::U64,
        TokenKind::UPtr,
        TokenKind::Void,
    ] {
        parser.stmt(kind, parse_var_decl_stmt);
    }

    // Control flow
    parser.stmt(TokenKind::Loop, parse_loop_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::CloseCurly, parse_block_close);

    // Everything else
    parser.stmt(TokenKind::Identifier, parse_ident_stmt);
    parser.stmt(TokenKind::InlineAsm, parse_inline_asm_stmt);
}

pub type StmtLookup<W> = HashMap<TokenKind, StmtHandler<W>>;
