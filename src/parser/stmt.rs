use std::io::Write;

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Node, NodeId},
        types::BaseType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    state::CompilerState,
    symbols::{
        scope::ScopeKind,
        symbol::{Symbol, SymbolId, SymbolKind},
    },
};

use super::{
    expr::parse_literal,
    parser::Parser,
    types::{check_storage, parse_array_suffix, parse_type},
};

type StmtResult = Result<Option<NodeId>, Error>;

/// Pushes `kind` for the `{` at the current token, then consumes it.
fn open_block<W: Write>(parser: &mut Parser<W>, kind: ScopeKind) -> Result<(), Error> {
    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Err(parser.unexpected(&TokenKind::OpenCurly.to_string()));
    }

    parser
        .state
        .scopes
        .push(kind)
        .map_err(|error| parser.error(error))?;
    parser.advance()?;
    Ok(())
}

fn require_procedure<W: Write>(parser: &Parser<W>, construct: &str) -> Result<SymbolId, Error> {
    parser.state.current_proc.ok_or_else(|| {
        parser.error(ErrorImpl::OutsideProcedure {
            construct: construct.to_string(),
        })
    })
}

fn missing_symbol<W: Write>(parser: &Parser<W>, id: SymbolId) -> Error {
    parser.error(ErrorImpl::SymbolNotDeclared {
        symbol: format!("#{}", id.0),
    })
}

fn lookup_symbol<W: Write>(parser: &Parser<W>, id: SymbolId) -> Result<&Symbol, Error> {
    parser
        .state
        .symtab
        .lookup_by_id(id)
        .ok_or_else(|| missing_symbol(parser, id))
}

fn symbol_mut<W: Write>(parser: &mut Parser<W>, id: SymbolId) -> Result<&mut Symbol, Error> {
    let position = parser.get_position();
    parser.state.symtab.lookup_by_id_mut(id).ok_or_else(|| {
        Error::new(
            ErrorImpl::SymbolNotDeclared {
                symbol: format!("#{}", id.0),
            },
            position,
        )
    })
}

/// Resolves `name` to a structure definition.
fn lookup_definition<W: Write>(parser: &Parser<W>, name: &str) -> Result<SymbolId, Error> {
    match parser.state.symtab.lookup_by_name(name) {
        Some(symbol) if symbol.is_structure_definition() => Ok(SymbolId(symbol.id)),
        Some(_) => Err(parser.error(ErrorImpl::NotAStructure {
            symbol: name.to_string(),
        })),
        None => Err(parser.error(ErrorImpl::SymbolNotDeclared {
            symbol: name.to_string(),
        })),
    }
}

/// Whether definition `outer` holds an instance of `inner` at any depth.
pub fn contains_structure(state: &CompilerState, outer: SymbolId, inner: SymbolId) -> bool {
    let Some(outer) = state.symtab.lookup_by_id(outer) else {
        return false;
    };

    outer.fields.iter().filter_map(|field| field.parent).any(|nested| {
        nested == inner || contains_structure(state, nested, inner)
    })
}

/// Whether `definition` has fields and every nested structure it holds does too.
pub fn is_complete(state: &CompilerState, definition: SymbolId) -> bool {
    let Some(definition) = state.symtab.lookup_by_id(definition) else {
        return false;
    };

    !definition.fields.is_empty()
        && definition
            .fields
            .iter()
            .filter_map(|field| field.parent)
            .all(|nested| is_complete(state, nested))
}

/// Consumes `( ... )`. Arguments are not bound.
fn skip_arguments<W: Write>(parser: &mut Parser<W>) -> Result<(), Error> {
    parser.expect(TokenKind::OpenParen)?;
    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::EOF {
            return Err(parser.error(ErrorImpl::UnexpectedEof));
        }
        parser.advance()?;
    }
    parser.advance()?;
    Ok(())
}

pub fn parse_pub_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    parser.expect(TokenKind::Pub)?;

    let token = parser.current_token().clone();
    match token.kind {
        TokenKind::Proc => parse_proc_decl_stmt(parser),
        TokenKind::Struct => parse_struct_decl_stmt(parser),
        kind if kind.is_base_type() => parse_var_decl_stmt(parser),
        TokenKind::Identifier => {
            let declares = parser
                .state
                .symtab
                .lookup_by_name(&token.value)
                .is_some_and(|s| s.kind == SymbolKind::Typedef || s.is_structure_definition());
            if !declares {
                return Err(parser.error(ErrorImpl::UnexpectedTokenDetailed {
                    token: token.value,
                    message: String::from("`pub` must precede a declaration"),
                }));
            }
            parse_ident_stmt(parser)
        }
        _ => Err(parser.unexpected("a declaration")),
    }
}

pub fn parse_proc_decl_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    let is_global = parser.lookbehind_is(1, TokenKind::Pub);
    parser.expect(TokenKind::Proc)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    if parser.state.current_proc.is_some() {
        return Err(parser.error(ErrorImpl::NestedProcedure { procedure: name }));
    }

    if parser.current_token_kind() == TokenKind::OpenParen {
        skip_arguments(parser)?;
    }
    parser.expect(TokenKind::Arrow)?;
    let datum = parse_type(parser)?;

    // A second declaration re-initialises the first in place.
    let existing = parser
        .state
        .symtab
        .lookup_by_name(&name)
        .filter(|symbol| symbol.kind == SymbolKind::Function)
        .map(|symbol| SymbolId(symbol.id));
    let symbol = match existing {
        Some(id) => {
            let symbol = symbol_mut(parser, id)?;
            symbol.datum = datum;
            symbol.is_global |= is_global;
            id
        }
        None => {
            let symbol = parser.state.symtab.declare(&name, datum.base);
            symbol.kind = SymbolKind::Function;
            symbol.datum = datum;
            symbol.is_global = is_global;
            SymbolId(symbol.id)
        }
    };

    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance()?;
            debug!("declared prototype {} -> {}", name, datum);
            Ok(None)
        }
        TokenKind::OpenCurly => {
            open_block(parser, ScopeKind::Procedure)?;
            parser.state.current_proc = Some(symbol);
            parser.state.unreachable = false;
            debug!("entering procedure {} -> {}", name, datum);
            Ok(Some(parser.alloc(Node::Proc { symbol })))
        }
        _ => Err(parser.unexpected("`;` or `{`")),
    }
}

pub fn parse_var_decl_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    let is_global = parser.lookbehind_is(1, TokenKind::Pub);
    let mut datum = parse_type(parser)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    if parser.current_token_kind() == TokenKind::OpenBracket {
        if datum.is_array() {
            return Err(parser.error(ErrorImpl::UnexpectedTokenDetailed {
                token: String::from("["),
                message: String::from("array size given twice"),
            }));
        }
        datum.array_size = parse_array_suffix(parser)?;
    }
    check_storage(parser, &name, &datum)?;

    if parser.state.current_proc.is_some() {
        return Err(parser.error(ErrorImpl::LocalVariable { variable: name }));
    }

    let symbol = parser.state.symtab.declare(&name, datum.base);
    symbol.kind = SymbolKind::Variable;
    symbol.datum = datum;
    symbol.is_global = is_global;
    let symbol = SymbolId(symbol.id);
    trace!("declared variable {}: {}", name, datum);

    if parser.current_token_kind() != TokenKind::Assignment {
        parser.expect(TokenKind::Semicolon)?;
        return Ok(Some(parser.alloc(Node::Var { symbol })));
    }

    if datum.is_array() {
        return Err(parser.error(ErrorImpl::UnexpectedTokenDetailed {
            token: String::from("="),
            message: String::from("arrays cannot have an initializer"),
        }));
    }
    parser.advance()?;
    let value = parse_literal(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Some(parser.alloc(Node::VarInit { symbol, value })))
}

pub fn parse_typedef_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    parser.expect(TokenKind::Type)?;
    let datum = parse_type(parser)?;
    parser.expect(TokenKind::Arrow)?;
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Semicolon)?;
    check_storage(parser, &name, &datum)?;

    let symbol = parser.state.symtab.declare(&name, datum.base);
    symbol.kind = SymbolKind::Typedef;
    symbol.datum = datum;
    trace!("declared type {} = {}", name, datum);

    Ok(None)
}

pub fn parse_struct_decl_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    let is_global = parser.lookbehind_is(1, TokenKind::Pub);
    parser.expect(TokenKind::Struct)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance()?;
            let symbol = find_or_declare_definition(parser, &name)?;
            Ok(Some(parser.alloc(Node::Struct { symbol })))
        }
        TokenKind::OpenCurly => {
            let symbol = find_or_declare_definition(parser, &name)?;
            if lookup_symbol(parser, symbol)?.has_body {
                return Err(parser.error(ErrorImpl::StructureRedefined { structure: name }));
            }

            open_block(parser, ScopeKind::Structure)?;
            while parser.current_token_kind() != TokenKind::CloseCurly {
                parse_field(parser, symbol)?;
            }
            parser.advance()?;
            parser.state.scopes.pop();
            symbol_mut(parser, symbol)?.has_body = true;

            debug!("defined structure {}", name);
            Ok(Some(parser.alloc(Node::Struct { symbol })))
        }
        TokenKind::Identifier => declare_instance(parser, &name, is_global),
        _ => Err(parser.unexpected("`;`, `{` or an instance name")),
    }
}

fn find_or_declare_definition<W: Write>(parser: &mut Parser<W>, name: &str) -> Result<SymbolId, Error> {
    if parser.state.symtab.lookup_by_name(name).is_some() {
        return lookup_definition(parser, name);
    }

    let symbol = parser.state.symtab.declare(name, BaseType::Invalid);
    symbol.kind = SymbolKind::Structure;
    Ok(SymbolId(symbol.id))
}

/// Parses one member of the structure `owner`.
fn parse_field<W: Write>(parser: &mut Parser<W>, owner: SymbolId) -> Result<(), Error> {
    let explicit_struct = parser.current_token_kind() == TokenKind::Struct;
    if explicit_struct {
        parser.advance()?;
    }

    let token = parser.current_token().clone();
    let nested = match token.kind {
        TokenKind::Identifier => match parser.state.symtab.lookup_by_name(&token.value) {
            Some(symbol) if symbol.is_structure_definition() => Some(SymbolId(symbol.id)),
            _ if explicit_struct => Some(lookup_definition(parser, &token.value)?),
            _ => None,
        },
        _ if explicit_struct => return Err(parser.unexpected("a structure name")),
        _ => None,
    };

    if let Some(nested) = nested {
        if nested == owner || contains_structure(&parser.state, nested, owner) {
            let structure = lookup_symbol(parser, owner)?.name.clone();
            return Err(parser.error(ErrorImpl::RecursiveStructure { structure }));
        }

        parser.advance()?;
        let name = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::Semicolon)?;

        let field = add_field(parser, owner, &name, BaseType::Invalid)?;
        field.kind = SymbolKind::Structure;
        field.parent = Some(nested);
        return Ok(());
    }

    let mut datum = parse_type(parser)?;
    let name = parser.expect(TokenKind::Identifier)?.value;
    if parser.current_token_kind() == TokenKind::OpenBracket {
        datum.array_size = parse_array_suffix(parser)?;
    }
    check_storage(parser, &name, &datum)?;
    parser.expect(TokenKind::Semicolon)?;

    let field = add_field(parser, owner, &name, datum.base)?;
    field.kind = SymbolKind::Variable;
    field.datum = datum;
    Ok(())
}

fn add_field<'a, W: Write>(
    parser: &'a mut Parser<W>,
    owner: SymbolId,
    name: &str,
    base: BaseType,
) -> Result<&'a mut Symbol, Error> {
    let position = parser.get_position();
    let owner = symbol_mut(parser, owner)?;

    if owner.lookup_field(name).is_some() {
        return Err(Error::new(
            ErrorImpl::FieldAlreadyDeclared {
                structure: owner.name.clone(),
                field: name.to_string(),
            },
            position,
        ));
    }

    Ok(owner.declare_field(name, base))
}

/// Declares an instance of the definition `structure`; the instance name is the current token.
fn declare_instance<W: Write>(parser: &mut Parser<W>, structure: &str, is_global: bool) -> StmtResult {
    let definition = lookup_definition(parser, structure)?;
    if !is_complete(&parser.state, definition) {
        return Err(parser.error(ErrorImpl::IncompleteStructure {
            structure: structure.to_string(),
        }));
    }
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Semicolon)?;

    if parser.state.current_proc.is_some() {
        return Err(parser.error(ErrorImpl::LocalVariable { variable: name }));
    }

    let symbol = parser.state.symtab.declare(&name, BaseType::Invalid);
    symbol.kind = SymbolKind::Structure;
    symbol.parent = Some(definition);
    symbol.is_global = is_global;
    let symbol = SymbolId(symbol.id);
    trace!("declared instance {} of {}", name, structure);

    Ok(Some(parser.alloc(Node::Struct { symbol })))
}

pub fn parse_ident_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    let is_global = parser.lookbehind_is(1, TokenKind::Pub);
    let name = parser.current_token().value.clone();

    let Some(symbol) = parser.state.symtab.lookup_by_name(&name) else {
        return Err(parser.error(ErrorImpl::SymbolNotDeclared { symbol: name }));
    };
    let kind = symbol.kind;
    let is_definition = symbol.is_structure_definition();
    let is_instance = symbol.is_structure_instance();
    let parent = symbol.parent;
    let symbol = SymbolId(symbol.id);

    if kind == SymbolKind::Typedef {
        return parse_var_decl_stmt(parser);
    }
    if is_definition {
        parser.advance()?;
        return declare_instance(parser, &name, is_global);
    }

    parser.advance()?;
    match parser.current_token_kind() {
        TokenKind::Assignment => {
            require_procedure(parser, "assignment")?;
            if kind != SymbolKind::Variable {
                return Err(parser.error(ErrorImpl::NotAVariable { symbol: name }));
            }

            let target = parser.alloc(Node::Symbol { symbol });
            parse_assignment(parser, target)
        }
        TokenKind::OpenParen => {
            require_procedure(parser, "call")?;
            if kind != SymbolKind::Function {
                return Err(parser.error(ErrorImpl::NotAFunction { symbol: name }));
            }

            skip_arguments(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(Some(parser.alloc(Node::Call { symbol })))
        }
        TokenKind::Dot => {
            require_procedure(parser, "assignment")?;
            let Some(definition) = parent.filter(|_| is_instance) else {
                return Err(parser.error(ErrorImpl::NotAStructure { symbol: name }));
            };

            let base = parser.alloc(Node::Symbol { symbol });
            let target = parse_field_chain(parser, base, definition, name)?;
            parse_assignment(parser, target)
        }
        _ => Err(parser.unexpected("`=`, `(` or `.`")),
    }
}

/// Parses `.field { .field }` starting at the first dot and returns the innermost access.
fn parse_field_chain<W: Write>(
    parser: &mut Parser<W>,
    mut base: NodeId,
    mut owner: SymbolId,
    mut path: String,
) -> Result<NodeId, Error> {
    loop {
        parser.expect(TokenKind::Dot)?;
        let field_name = parser.expect(TokenKind::Identifier)?.value;

        let definition = lookup_symbol(parser, owner)?;
        let Some(field) = definition.lookup_field(&field_name) else {
            return Err(parser.error(ErrorImpl::FieldNotDeclared {
                structure: definition.name.clone(),
                field: field_name,
            }));
        };
        let (index, nested) = (field.id, field.parent);

        base = parser.alloc(Node::FieldAccess {
            base,
            owner,
            field: index,
        });
        path = format!("{}.{}", path, field_name);

        match (nested, parser.current_token_kind()) {
            (Some(nested), TokenKind::Dot) => owner = nested,
            (Some(_), _) => return Err(parser.error(ErrorImpl::NotAVariable { symbol: path })),
            (None, TokenKind::Dot) => {
                return Err(parser.error(ErrorImpl::NotAStructure { symbol: path }))
            }
            (None, _) => return Ok(base),
        }
    }
}

fn parse_assignment<W: Write>(parser: &mut Parser<W>, target: NodeId) -> StmtResult {
    parser.expect(TokenKind::Assignment)?;
    let value = parse_literal(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Some(parser.alloc(Node::Assign { target, value })))
}

pub fn parse_loop_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    require_procedure(parser, "loop")?;
    parser.expect(TokenKind::Loop)?;
    open_block(parser, ScopeKind::Loop)?;

    Ok(Some(parser.alloc(Node::Loop {
        epilogue: false,
        reachable: true,
    })))
}

pub fn parse_if_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    require_procedure(parser, "if")?;
    parser.expect(TokenKind::If)?;
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_literal(parser)?;
    parser.expect(TokenKind::CloseParen)?;
    open_block(parser, ScopeKind::Conditional)?;

    Ok(Some(parser.alloc(Node::If {
        condition: Some(condition),
        epilogue: false,
    })))
}

pub fn parse_break_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    require_procedure(parser, "break")?;
    parser.expect(TokenKind::Break)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Some(parser.alloc(Node::Break)))
}

pub fn parse_continue_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    require_procedure(parser, "continue")?;
    parser.expect(TokenKind::Continue)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Some(parser.alloc(Node::Continue)))
}

pub fn parse_return_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    let proc = require_procedure(parser, "return")?;
    parser.expect(TokenKind::Return)?;

    let value = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_literal(parser)?)
    };
    parser.expect(TokenKind::Semicolon)?;
    parser.state.unreachable = true;

    Ok(Some(parser.alloc(Node::Return {
        proc,
        value,
        epilogue: false,
    })))
}

pub fn parse_inline_asm_stmt<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    let text = parser.expect(TokenKind::InlineAsm)?.value;
    Ok(Some(parser.alloc(Node::InlineAsm { text })))
}

/// Closes the innermost block, synthesizing its epilogue node.
pub fn parse_block_close<W: Write>(parser: &mut Parser<W>) -> StmtResult {
    let scope = parser.state.scopes.pop();
    if scope == ScopeKind::None {
        return Err(parser.error(ErrorImpl::UnmatchedCloseCurly));
    }
    parser.expect(TokenKind::CloseCurly)?;

    let unreachable = std::mem::take(&mut parser.state.unreachable);
    trace!("closing {:?} block", scope);

    match scope {
        ScopeKind::Procedure => {
            let Some(proc) = parser.state.current_proc.take() else {
                return Err(parser.error(ErrorImpl::UnmatchedCloseCurly));
            };
            if unreachable {
                return Ok(None);
            }

            Ok(Some(parser.alloc(Node::Return {
                proc,
                value: None,
                epilogue: true,
            })))
        }
        ScopeKind::Loop => Ok(Some(parser.alloc(Node::Loop {
            epilogue: true,
            reachable: !unreachable,
        }))),
        ScopeKind::Conditional => Ok(Some(parser.alloc(Node::If {
            condition: None,
            epilogue: true,
        }))),
        ScopeKind::Structure | ScopeKind::None => Ok(None),
    }
}
