use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::UnexpectedEof => "UnexpectedEof",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SymbolNotDeclared { .. } => "SymbolNotDeclared",
            ErrorImpl::FieldNotDeclared { .. } => "FieldNotDeclared",
            ErrorImpl::FieldAlreadyDeclared { .. } => "FieldAlreadyDeclared",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::NotAVariable { .. } => "NotAVariable",
            ErrorImpl::NotAStructure { .. } => "NotAStructure",
            ErrorImpl::StructureRedefined { .. } => "StructureRedefined",
            ErrorImpl::RecursiveStructure { .. } => "RecursiveStructure",
            ErrorImpl::IncompleteStructure { .. } => "IncompleteStructure",
            ErrorImpl::NestedProcedure { .. } => "NestedProcedure",
            ErrorImpl::LocalVariable { .. } => "LocalVariable",
            ErrorImpl::OutsideProcedure { .. } => "OutsideProcedure",
            ErrorImpl::UnmatchedCloseCurly => "UnmatchedCloseCurly",
            ErrorImpl::NoEnclosingLoop { .. } => "NoEnclosingLoop",
            ErrorImpl::InvalidSize { .. } => "InvalidSize",
            ErrorImpl::ArrayTooLarge { .. } => "ArrayTooLarge",
            ErrorImpl::ValueOutOfRange { .. } => "ValueOutOfRange",
            ErrorImpl::ScopeOverflow { .. } => "ScopeOverflow",
            ErrorImpl::RegistersExhausted => "RegistersExhausted",
            ErrorImpl::BadNode { .. } => "BadNode",
            ErrorImpl::NotImplementedError { .. } => "NotImplementedError",
            ErrorImpl::Io { .. } => "Io",
            ErrorImpl::AssemblerFailed { .. } => "AssemblerFailed",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedToken { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {}, got `{}`",
                expected, received
            )),
            ErrorImpl::UnexpectedEof => {
                ErrorTip::Suggestion(String::from("Is a closing `}` missing?"))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::SymbolNotDeclared { symbol } => {
                ErrorTip::Suggestion(format!("Symbol `{}` not declared", symbol))
            }
            ErrorImpl::FieldNotDeclared { structure, field } => ErrorTip::Suggestion(format!(
                "Structure `{}` has no field `{}`",
                structure, field
            )),
            ErrorImpl::FieldAlreadyDeclared { structure, field } => ErrorTip::Suggestion(format!(
                "Structure `{}` already has a field `{}`",
                structure, field
            )),
            ErrorImpl::NotAFunction { symbol } => {
                ErrorTip::Suggestion(format!("`{}` is not a procedure", symbol))
            }
            ErrorImpl::NotAVariable { symbol } => {
                ErrorTip::Suggestion(format!("`{}` is not a variable", symbol))
            }
            ErrorImpl::NotAStructure { symbol } => {
                ErrorTip::Suggestion(format!("`{}` is not a structure", symbol))
            }
            ErrorImpl::StructureRedefined { structure } => {
                ErrorTip::Suggestion(format!("Structure `{}` already has a body", structure))
            }
            ErrorImpl::RecursiveStructure { structure } => ErrorTip::Suggestion(format!(
                "Structure `{}` cannot contain itself",
                structure
            )),
            ErrorImpl::IncompleteStructure { structure } => ErrorTip::Suggestion(format!(
                "Give `{}` a body with at least one field before declaring instances",
                structure
            )),
            ErrorImpl::NestedProcedure { procedure } => ErrorTip::Suggestion(format!(
                "Procedure `{}` is declared inside another procedure",
                procedure
            )),
            ErrorImpl::LocalVariable { variable } => ErrorTip::Suggestion(format!(
                "Move `{}` out of the procedure, locals are not supported",
                variable
            )),
            ErrorImpl::OutsideProcedure { construct } => {
                ErrorTip::Suggestion(format!("`{}` must appear inside a procedure", construct))
            }
            ErrorImpl::UnmatchedCloseCurly => {
                ErrorTip::Suggestion(String::from("There is no open block to close"))
            }
            ErrorImpl::NoEnclosingLoop { statement } => {
                ErrorTip::Suggestion(format!("`{}` must appear inside a loop", statement))
            }
            ErrorImpl::InvalidSize { name } => {
                ErrorTip::Suggestion(format!("`{}` has a type with no machine size", name))
            }
            ErrorImpl::ArrayTooLarge { name } => {
                ErrorTip::Suggestion(format!("`{}` needs more bytes than can be addressed", name))
            }
            ErrorImpl::ValueOutOfRange { value, name } => {
                ErrorTip::Suggestion(format!("{} does not fit the type of `{}`", value, name))
            }
            ErrorImpl::ScopeOverflow { max } => {
                ErrorTip::Suggestion(format!("Blocks may only nest {} deep", max))
            }
            ErrorImpl::RegistersExhausted => ErrorTip::None,
            ErrorImpl::BadNode { node } => {
                ErrorTip::Suggestion(format!("Cannot generate code for {}", node))
            }
            ErrorImpl::NotImplementedError { feature } => {
                ErrorTip::Suggestion(format!("{} is not supported yet", feature))
            }
            ErrorImpl::Io { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::AssemblerFailed { stderr } => ErrorTip::Suggestion(stderr.clone()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [near line {} of {}]",
            self.internal_error, self.position.0, self.position.1
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected {expected}, got {received:?}")]
    ExpectedToken { expected: String, received: String },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("symbol {symbol:?} not declared")]
    SymbolNotDeclared { symbol: String },
    #[error("structure {structure:?} has no field {field:?}")]
    FieldNotDeclared { structure: String, field: String },
    #[error("field {field:?} of structure {structure:?} declared twice")]
    FieldAlreadyDeclared { structure: String, field: String },
    #[error("{symbol:?} is not a procedure")]
    NotAFunction { symbol: String },
    #[error("{symbol:?} is not a variable")]
    NotAVariable { symbol: String },
    #[error("{symbol:?} is not a structure")]
    NotAStructure { symbol: String },
    #[error("structure {structure:?} redefined")]
    StructureRedefined { structure: String },
    #[error("structure {structure:?} contains itself")]
    RecursiveStructure { structure: String },
    #[error("structure {structure:?} has no fields")]
    IncompleteStructure { structure: String },
    #[error("nested procedure {procedure:?}")]
    NestedProcedure { procedure: String },
    #[error("local variable {variable:?} is not supported")]
    LocalVariable { variable: String },
    #[error("{construct} outside of a procedure")]
    OutsideProcedure { construct: String },
    #[error("unmatched '}}'")]
    UnmatchedCloseCurly,
    #[error("{statement} outside of a loop")]
    NoEnclosingLoop { statement: String },
    #[error("{name:?} has no machine size")]
    InvalidSize { name: String },
    #[error("array {name:?} is too large")]
    ArrayTooLarge { name: String },
    #[error("value {value} out of range for {name:?}")]
    ValueOutOfRange { value: i64, name: String },
    #[error("maximum scope depth of {max} reached")]
    ScopeOverflow { max: usize },
    #[error("out of temporary registers")]
    RegistersExhausted,
    #[error("got bad ast node {node}")]
    BadNode { node: String },
    #[error("{feature} is not implemented")]
    NotImplementedError { feature: String },
    #[error("i/o error: {message}")]
    Io { message: String },
    #[error("assembler failed: {stderr}")]
    AssemblerFailed { stderr: String },
}
