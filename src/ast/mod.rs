/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Node kinds and the per-unit node arena
/// - types: Datum types and machine sizes
pub mod ast;
pub mod types;
