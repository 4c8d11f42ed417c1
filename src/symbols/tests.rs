//! Unit tests for the symbol table and scope stack.

use crate::{
    ast::types::BaseType,
    errors::errors::ErrorImpl,
    symbols::{
        scope::{ScopeKind, ScopeStack, SCOPE_STACK_MAX},
        symbol::{SymbolId, SymbolKind, SymbolTable},
    },
};

#[test]
fn test_declare_assigns_sequential_ids() {
    let mut table = SymbolTable::new();

    let first = table.declare("a", BaseType::U8);
    assert_eq!(first.id, 0);
    assert_eq!(first.kind, SymbolKind::None);

    let second = table.declare("b", BaseType::U32);
    assert_eq!(second.id, 1);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_lookup_by_name_and_id() {
    let mut table = SymbolTable::new();
    table.declare("a", BaseType::U8);
    table.declare("b", BaseType::U16).kind = SymbolKind::Variable;

    let b = table.lookup_by_name("b").unwrap();
    assert_eq!(b.id, 1);
    assert_eq!(b.datum.base, BaseType::U16);
    assert_eq!(table.lookup_by_id(SymbolId(0)).unwrap().name, "a");
    assert!(table.lookup_by_name("c").is_none());
    assert!(table.lookup_by_id(SymbolId(2)).is_none());
}

#[test]
fn test_first_declaration_wins() {
    let mut table = SymbolTable::new();
    table.declare("main", BaseType::U8).kind = SymbolKind::Function;
    table.declare("main", BaseType::U64).kind = SymbolKind::Variable;

    let found = table.lookup_by_name("main").unwrap();
    assert_eq!(found.id, 0);
    assert_eq!(found.kind, SymbolKind::Function);
}

#[test]
fn test_field_ids_are_independent() {
    let mut table = SymbolTable::new();
    table.declare("unrelated", BaseType::U8);

    let point = table.declare("Point", BaseType::Invalid);
    point.kind = SymbolKind::Structure;
    point.declare_field("x", BaseType::U32);
    let y = point.declare_field("y", BaseType::U32);
    assert_eq!(y.id, 1);

    let point = table.lookup_by_name("Point").unwrap();
    assert_eq!(point.id, 1);
    assert_eq!(point.lookup_field("x").unwrap().id, 0);
    assert!(point.lookup_field("z").is_none());
    assert!(point.is_structure_definition());
}

#[test]
fn test_same_field_name_in_two_structures() {
    let mut table = SymbolTable::new();
    table.declare("A", BaseType::Invalid).declare_field("x", BaseType::U8);
    table.declare("B", BaseType::Invalid).declare_field("x", BaseType::U64);

    let a = table.lookup_by_name("A").unwrap().lookup_field("x").unwrap();
    let b = table.lookup_by_name("B").unwrap().lookup_field("x").unwrap();
    assert_eq!(a.datum.base, BaseType::U8);
    assert_eq!(b.datum.base, BaseType::U64);
}

#[test]
fn test_scope_push_pop() {
    let mut scopes = ScopeStack::new();
    scopes.push(ScopeKind::Procedure).unwrap();
    scopes.push(ScopeKind::Loop).unwrap();

    assert_eq!(scopes.top(), ScopeKind::Loop);
    assert_eq!(scopes.pop(), ScopeKind::Loop);
    assert_eq!(scopes.pop(), ScopeKind::Procedure);
    assert_eq!(scopes.depth(), 0);
}

#[test]
fn test_empty_scope_stack_returns_sentinel() {
    let mut scopes = ScopeStack::new();
    assert_eq!(scopes.top(), ScopeKind::None);
    assert_eq!(scopes.pop(), ScopeKind::None);

    scopes.push(ScopeKind::Conditional).unwrap();
    scopes.pop();
    assert_eq!(scopes.pop(), ScopeKind::None);
}

#[test]
fn test_scope_overflow_keeps_entries() {
    let mut scopes = ScopeStack::new();
    scopes.push(ScopeKind::Procedure).unwrap();
    for _ in 1..SCOPE_STACK_MAX {
        scopes.push(ScopeKind::Loop).unwrap();
    }

    assert_eq!(
        scopes.push(ScopeKind::Conditional),
        Err(ErrorImpl::ScopeOverflow {
            max: SCOPE_STACK_MAX
        })
    );
    assert_eq!(scopes.depth(), SCOPE_STACK_MAX);
    assert_eq!(scopes.top(), ScopeKind::Loop);

    for _ in 1..SCOPE_STACK_MAX {
        assert_eq!(scopes.pop(), ScopeKind::Loop);
    }
    assert_eq!(scopes.pop(), ScopeKind::Procedure);
}
