//! Type parsing.
//!
//! A type is a base-type keyword or a typedef name, then any number of `*`
//! pointer markers, then an optional `[N]` array suffix.

use std::io::Write;

use crate::{
    ast::types::{BaseType, DatumType},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    symbols::symbol::SymbolKind,
};

use super::{expr::parse_count, parser::Parser};

pub fn parse_type<W: Write>(parser: &mut Parser<W>) -> Result<DatumType, Error> {
    let token = parser.current_token().clone();

    let mut datum = if token.kind.is_base_type() {
        DatumType::new(BaseType::from_token(token.kind))
    } else if token.kind == TokenKind::Identifier {
        match parser.state.symtab.lookup_by_name(&token.value) {
            Some(symbol) if symbol.kind == SymbolKind::Typedef => symbol.datum,
            Some(_) => {
                return Err(parser.error(ErrorImpl::UnexpectedTokenDetailed {
                    token: token.value,
                    message: String::from("expected a type name"),
                }))
            }
            None => {
                return Err(parser.error(ErrorImpl::SymbolNotDeclared {
                    symbol: token.value,
                }))
            }
        }
    } else {
        return Err(parser.unexpected("a type"));
    };
    parser.advance()?;

    while parser.current_token_kind() == TokenKind::Star {
        parser.advance()?;
        datum.ptr_depth += 1;
    }

    if parser.current_token_kind() == TokenKind::OpenBracket {
        datum.array_size = parse_array_suffix(parser)?;
    }

    Ok(datum)
}

/// Rejects an array whose total size in bytes overflows.
pub fn check_storage<W: Write>(parser: &Parser<W>, name: &str, datum: &DatumType) -> Result<(), Error> {
    match datum.storage_size() {
        Some(_) => Ok(()),
        None => Err(parser.error(ErrorImpl::ArrayTooLarge {
            name: name.to_string(),
        })),
    }
}

/// Parses `[ N ]` and returns `N`, which must be non-zero.
pub fn parse_array_suffix<W: Write>(parser: &mut Parser<W>) -> Result<usize, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let count = parse_count(parser)?;
    parser.expect(TokenKind::CloseBracket)?;
    Ok(count)
}
