//! Operand parsing. Only integer literals are accepted as values.

use std::io::Write;

use crate::{
    ast::ast::{Node, NodeId},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses an optionally negated integer literal into a number node.
pub fn parse_literal<W: Write>(parser: &mut Parser<W>) -> Result<NodeId, Error> {
    let negative = parser.current_token_kind() == TokenKind::Dash;
    if negative {
        parser.advance()?;
    }

    if parser.current_token_kind() != TokenKind::Number {
        return Err(parser.unexpected("a number"));
    }

    let digits = parser.current_token().value.clone();
    let text = if negative { format!("-{}", digits) } else { digits };
    let value = text
        .parse::<i64>()
        .map_err(|_| parser.error(ErrorImpl::NumberParseError { token: text.clone() }))?;
    parser.advance()?;

    Ok(parser.alloc(Node::Number { value }))
}

/// Parses a non-zero element count.
pub fn parse_count<W: Write>(parser: &mut Parser<W>) -> Result<usize, Error> {
    if parser.current_token_kind() != TokenKind::Number {
        return Err(parser.unexpected("an element count"));
    }

    let text = parser.current_token().value.clone();
    let count = text
        .parse::<usize>()
        .map_err(|_| parser.error(ErrorImpl::NumberParseError { token: text.clone() }))?;
    if count == 0 {
        return Err(parser.error(ErrorImpl::UnexpectedTokenDetailed {
            token: text,
            message: String::from("array size must be non-zero"),
        }));
    }
    parser.advance()?;

    Ok(count)
}
