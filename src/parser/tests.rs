//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Procedure, variable and typedef declarations
//! - Structure definitions, forward declarations and instances
//! - Block handling and epilogue synthesis
//! - Semantic rejections

use std::rc::Rc;

use super::parser::Parser;
use crate::{
    ast::{ast::Node, types::BaseType},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    symbols::symbol::{SymbolId, SymbolKind},
};

fn parse_source(source: &str) -> (Parser<Vec<u8>>, Result<(), Error>) {
    let mut parser = Parser::new(
        source.to_string(),
        Rc::new(String::from("test.bup")),
        Vec::new(),
    );
    let result = parser.parse();
    (parser, result)
}

fn parse_error(source: &str) -> ErrorImpl {
    let (_, result) = parse_source(source);
    result.expect_err("source should be rejected").get_impl().clone()
}

#[test]
fn test_parse_procedure_declaration() {
    let (parser, result) = parse_source("pub proc main -> u8 { return 7; }");
    assert!(result.is_ok());

    let main = parser.state.symtab.lookup_by_name("main").unwrap();
    assert_eq!(main.kind, SymbolKind::Function);
    assert_eq!(main.datum.base, BaseType::U8);
    assert!(main.is_global);

    assert!(parser.state.current_proc.is_none());
    assert_eq!(parser.state.scopes.depth(), 0);
}

#[test]
fn test_parse_procedure_arguments_are_skipped() {
    let (parser, result) = parse_source("proc add(u32 a, u32 b) -> u32 { return 3; }");
    assert!(result.is_ok());
    assert_eq!(parser.state.symtab.len(), 1);
}

#[test]
fn test_prototype_then_definition_reuses_symbol() {
    let (parser, result) = parse_source("pub proc f -> u16; proc f -> u32 { return 1; }");
    assert!(result.is_ok());
    assert_eq!(parser.state.symtab.len(), 1);

    let f = parser.state.symtab.lookup_by_name("f").unwrap();
    assert_eq!(f.datum.base, BaseType::U32);
    assert!(f.is_global);
}

#[test]
fn test_return_suppresses_procedure_epilogue() {
    let (parser, result) = parse_source("proc f -> u8 { return 1; }");
    assert!(result.is_ok());

    // Proc, Number, Return and nothing synthesized at the close.
    assert_eq!(parser.state.arena.len(), 3);
    assert!(!parser.state.unreachable);
}

#[test]
fn test_procedure_close_synthesizes_epilogue() {
    let (parser, result) = parse_source("proc f -> void { }");
    assert!(result.is_ok());

    let last = parser.state.arena.get(crate::ast::ast::NodeId(1)).unwrap();
    assert_eq!(
        last,
        &Node::Return {
            proc: SymbolId(0),
            value: None,
            epilogue: true
        }
    );
}

#[test]
fn test_pub_variable_lookbehind() {
    let (parser, result) = parse_source("pub u32 counter = 5; u8 flag;");
    assert!(result.is_ok());

    let counter = parser.state.symtab.lookup_by_name("counter").unwrap();
    assert!(counter.is_global);
    assert_eq!(counter.kind, SymbolKind::Variable);

    let flag = parser.state.symtab.lookup_by_name("flag").unwrap();
    assert!(!flag.is_global);
    assert!(parser.lookbehind_is(0, TokenKind::EOF));
}

#[test]
fn test_array_suffix_after_type_or_name() {
    let (parser, result) = parse_source("u8[16] a; u32 b[4];");
    assert!(result.is_ok());

    assert_eq!(parser.state.symtab.lookup_by_name("a").unwrap().datum.array_size, 16);
    assert_eq!(parser.state.symtab.lookup_by_name("b").unwrap().datum.array_size, 4);
}

#[test]
fn test_typedef_alias() {
    let (parser, result) = parse_source("type u32* -> ptr; pub ptr p;");
    assert!(result.is_ok());

    let alias = parser.state.symtab.lookup_by_name("ptr").unwrap();
    assert_eq!(alias.kind, SymbolKind::Typedef);

    let p = parser.state.symtab.lookup_by_name("p").unwrap();
    assert_eq!(p.kind, SymbolKind::Variable);
    assert_eq!(p.datum.base, BaseType::U32);
    assert_eq!(p.datum.ptr_depth, 1);
    assert!(p.is_global);
}

#[test]
fn test_forward_declared_structure_is_reused() {
    let (parser, result) = parse_source("struct Point; struct Point { u32 x; u32 y; } Point p;");
    assert!(result.is_ok());
    assert_eq!(parser.state.symtab.len(), 2);

    let point = parser.state.symtab.lookup_by_name("Point").unwrap();
    assert!(point.is_structure_definition());
    assert_eq!(point.fields.len(), 2);
    assert_eq!(point.lookup_field("y").unwrap().id, 1);

    let p = parser.state.symtab.lookup_by_name("p").unwrap();
    assert!(p.is_structure_instance());
    assert_eq!(p.parent, Some(SymbolId(0)));
}

#[test]
fn test_same_field_name_in_two_structures() {
    let (parser, result) = parse_source("struct A { u8 v; } struct B { u16 v; }");
    assert!(result.is_ok());

    let a = parser.state.symtab.lookup_by_name("A").unwrap();
    let b = parser.state.symtab.lookup_by_name("B").unwrap();
    assert_eq!(a.lookup_field("v").unwrap().datum.base, BaseType::U8);
    assert_eq!(b.lookup_field("v").unwrap().datum.base, BaseType::U16);
}

#[test]
fn test_nested_structure_fields() {
    let (parser, result) =
        parse_source("struct Inner { u8 a; } struct Outer { Inner i; struct Inner j; u32 k; }");
    assert!(result.is_ok());

    let outer = parser.state.symtab.lookup_by_name("Outer").unwrap();
    assert_eq!(outer.fields[0].parent, Some(SymbolId(0)));
    assert_eq!(outer.fields[1].parent, Some(SymbolId(0)));
    assert_eq!(outer.fields[2].parent, None);
    assert_eq!(outer.fields[2].kind, SymbolKind::Variable);
}

#[test]
fn test_struct_keyword_instance() {
    let (parser, result) = parse_source("struct S { u8 a; } pub struct S s;");
    assert!(result.is_ok());

    let s = parser.state.symtab.lookup_by_name("s").unwrap();
    assert!(s.is_structure_instance());
    assert!(s.is_global);
}

#[test]
fn test_recursive_structures_rejected() {
    assert!(matches!(
        parse_error("struct A { A a; }"),
        ErrorImpl::RecursiveStructure { .. }
    ));
    assert!(matches!(
        parse_error("struct B; struct A { B b; } struct B { A a; }"),
        ErrorImpl::RecursiveStructure { .. }
    ));
}

#[test]
fn test_structure_errors() {
    assert!(matches!(
        parse_error("struct A { u8 x; u16 x; }"),
        ErrorImpl::FieldAlreadyDeclared { .. }
    ));
    assert!(matches!(
        parse_error("struct A { u8 x; } struct A { u8 y; }"),
        ErrorImpl::StructureRedefined { .. }
    ));
    assert!(matches!(
        parse_error("u8 x; struct x y;"),
        ErrorImpl::NotAStructure { .. }
    ));
    assert!(matches!(
        parse_error("struct P { u8 x; } P p; proc f -> u8 { p.y = 1; }"),
        ErrorImpl::FieldNotDeclared { .. }
    ));
}

#[test]
fn test_procedure_errors() {
    assert!(matches!(
        parse_error("proc a -> u8 { proc b -> u8; }"),
        ErrorImpl::NestedProcedure { .. }
    ));
    assert!(matches!(
        parse_error("proc a -> u8 { u8 x; }"),
        ErrorImpl::LocalVariable { .. }
    ));
    assert!(matches!(
        parse_error("loop { }"),
        ErrorImpl::OutsideProcedure { .. }
    ));
    assert!(matches!(
        parse_error("return 1;"),
        ErrorImpl::OutsideProcedure { .. }
    ));
}

#[test]
fn test_symbol_errors() {
    assert!(matches!(
        parse_error("proc a -> u8 { x = 1; }"),
        ErrorImpl::SymbolNotDeclared { .. }
    ));
    assert!(matches!(
        parse_error("u8 x; proc a -> u8 { x(); }"),
        ErrorImpl::NotAFunction { .. }
    ));
    assert!(matches!(
        parse_error("proc f -> u8; proc a -> u8 { f = 1; }"),
        ErrorImpl::NotAVariable { .. }
    ));
    assert!(matches!(
        parse_error("type u8 -> byte; byte = 1;"),
        ErrorImpl::ExpectedToken { .. }
    ));
}

#[test]
fn test_block_errors() {
    assert_eq!(parse_error("}"), ErrorImpl::UnmatchedCloseCurly);
    assert_eq!(parse_error("proc a -> u8 {"), ErrorImpl::UnexpectedEof);
    assert_eq!(parse_error("proc a -> u8 { loop {"), ErrorImpl::UnexpectedEof);
}

#[test]
fn test_array_size_must_be_nonzero() {
    assert!(matches!(
        parse_error("u8 a[0];"),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
    assert!(matches!(
        parse_error("u8 a[2] = 1;"),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
}

#[test]
fn test_scope_overflow() {
    let source = format!("proc f -> u8 {{ {}", "loop { ".repeat(8));
    assert_eq!(parse_error(&source), ErrorImpl::ScopeOverflow { max: 8 });
}

#[test]
fn test_error_carries_line_number() {
    let (_, result) = parse_source("u32 a;\nu32 b;\nzzz = 1;");
    let error = result.unwrap_err();

    assert_eq!(error.get_position().0, 3);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::SymbolNotDeclared {
            symbol: String::from("zzz")
        }
    );
}

#[test]
fn test_instances_need_a_complete_structure() {
    assert_eq!(
        parse_error("struct S;\nS a;"),
        ErrorImpl::IncompleteStructure {
            structure: String::from("S")
        }
    );
    assert!(matches!(
        parse_error("struct S { } S a;"),
        ErrorImpl::IncompleteStructure { .. }
    ));
    assert!(matches!(
        parse_error("struct Inner; struct Outer { Inner i; } Outer o;"),
        ErrorImpl::IncompleteStructure { .. }
    ));

    let (_, result) =
        parse_source("struct Inner; struct Outer { Inner i; } struct Inner { u8 a; } Outer o;");
    assert!(result.is_ok());
}

#[test]
fn test_empty_body_counts_as_definition() {
    let (parser, result) = parse_source("struct S { }");
    assert!(result.is_ok());
    assert!(parser.state.symtab.lookup_by_name("S").unwrap().has_body);

    assert_eq!(
        parse_error("struct S { } struct S { u8 x; }"),
        ErrorImpl::StructureRedefined {
            structure: String::from("S")
        }
    );

    let (parser, result) = parse_source("struct S; struct S;");
    assert!(result.is_ok());
    assert!(!parser.state.symtab.lookup_by_name("S").unwrap().has_body);
}

#[test]
fn test_oversized_arrays_rejected() {
    assert_eq!(
        parse_error("u64 big[4611686018427387904];"),
        ErrorImpl::ArrayTooLarge {
            name: String::from("big")
        }
    );
    assert!(matches!(
        parse_error("struct S { u32 many[9223372036854775807]; }"),
        ErrorImpl::ArrayTooLarge { .. }
    ));
    assert!(matches!(
        parse_error("type u16[9223372036854775807] -> wide;"),
        ErrorImpl::ArrayTooLarge { .. }
    ));
}

#[test]
fn test_field_chain_needs_an_instance() {
    assert_eq!(
        parse_error("u8 x; proc f -> void { x.y = 1; }"),
        ErrorImpl::NotAStructure {
            symbol: String::from("x")
        }
    );
}
