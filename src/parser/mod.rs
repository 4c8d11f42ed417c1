//! Single-pass parser.
//!
//! The parser pulls tokens from the lexer one at a time, binds declarations
//! in the symbol table, tracks open blocks on the scope stack and hands each
//! finished statement to the code generator straight away:
//!
//! - Declarations (procedures, variables, structures, typedefs)
//! - Control flow (loops, conditionals, break/continue, return)
//! - Assignments, field-chain assignments and calls
//! - Inline assembly
//!
//! Statement rules are looked up by the kind of their first token.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
