//! Code generation module for the compiler.
//!
//! This module lowers finished AST subtrees into NASM x86-64 text. It handles:
//!
//! - Section tracking and switching
//! - Label synthesis for loops and conditionals
//! - Scratch register allocation
//! - Data slots for globals, arrays and structure instances

pub mod compiler;
pub mod regs;
pub mod stmt;
pub mod x86_64;
