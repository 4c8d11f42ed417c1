//! Symbol table and scope tracking.
//!
//! - `symbol`: declared names (variables, procedures, structures, typedefs)
//!   and the fields owned by structure definitions
//! - `scope`: the bounded stack of open block kinds

pub mod scope;
pub mod symbol;

#[cfg(test)]
mod tests;
