//! Unit tests for error handling.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at_line(line: u32) -> Position {
    Position(line, Rc::new("test.bup".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "$".to_string(),
        },
        at_line(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_expected_token_error() {
    let error = Error::new(
        ErrorImpl::ExpectedToken {
            expected: "Semicolon".to_string(),
            received: "}".to_string(),
        },
        at_line(3),
    );

    assert_eq!(error.get_error_name(), "ExpectedToken");
    assert_eq!(error.get_tip().to_string(), "Expected Semicolon, got `}`");
}

#[test]
fn test_display_carries_line_number() {
    let error = Error::new(
        ErrorImpl::SymbolNotDeclared {
            symbol: "foo".to_string(),
        },
        at_line(7),
    );

    assert_eq!(
        error.to_string(),
        "symbol \"foo\" not declared [near line 7 of test.bup]"
    );
}

#[test]
fn test_resource_errors() {
    let overflow = Error::new(ErrorImpl::ScopeOverflow { max: 8 }, at_line(1));
    assert_eq!(overflow.get_error_name(), "ScopeOverflow");
    assert_eq!(overflow.get_tip().to_string(), "Blocks may only nest 8 deep");

    let exhausted = Error::new(ErrorImpl::RegistersExhausted, at_line(1));
    assert_eq!(exhausted.get_error_name(), "RegistersExhausted");
    assert!(matches!(exhausted.get_tip(), ErrorTip::None));
}

#[test]
fn test_semantic_error_names() {
    let cases = [
        (ErrorImpl::NotAFunction { symbol: "x".into() }, "NotAFunction"),
        (ErrorImpl::NotAVariable { symbol: "f".into() }, "NotAVariable"),
        (ErrorImpl::NotAStructure { symbol: "x".into() }, "NotAStructure"),
        (ErrorImpl::NestedProcedure { procedure: "g".into() }, "NestedProcedure"),
        (ErrorImpl::LocalVariable { variable: "y".into() }, "LocalVariable"),
        (
            ErrorImpl::FieldAlreadyDeclared {
                structure: "P".into(),
                field: "x".into(),
            },
            "FieldAlreadyDeclared",
        ),
    ];

    for (error_impl, name) in cases {
        assert_eq!(Error::new(error_impl, at_line(1)).get_error_name(), name);
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_unmatched_close_display() {
    let error = Error::new(ErrorImpl::UnmatchedCloseCurly, at_line(2));
    assert_eq!(error.get_impl().to_string(), "unmatched '}'");
}

#[test]
fn test_size_and_structure_errors() {
    let range = Error::new(
        ErrorImpl::ValueOutOfRange {
            value: 300,
            name: "x".to_string(),
        },
        at_line(2),
    );
    assert_eq!(range.get_error_name(), "ValueOutOfRange");
    assert_eq!(range.to_string(), "value 300 out of range for \"x\" [near line 2 of test.bup]");
    assert_eq!(range.get_tip().to_string(), "300 does not fit the type of `x`");

    let incomplete = Error::new(
        ErrorImpl::IncompleteStructure {
            structure: "S".to_string(),
        },
        at_line(1),
    );
    assert_eq!(incomplete.get_error_name(), "IncompleteStructure");
    assert_eq!(incomplete.get_impl().to_string(), "structure \"S\" has no fields");

    let large = Error::new(ErrorImpl::ArrayTooLarge { name: "big".to_string() }, at_line(1));
    assert_eq!(large.get_error_name(), "ArrayTooLarge");
}
