//! Core code generator state.
//!
//! The generator lowers one finished AST subtree at a time straight into
//! NASM text. Between calls it only remembers the current output section,
//! the label counters, the open loop and conditional ids and the scratch
//! register bitmap.

use std::io::Write;

use log::debug;

use crate::{
    ast::ast::NodeId,
    errors::errors::{Error, ErrorImpl},
    state::CompilerState,
};

use super::{
    regs::{Register, RegisterPool},
    stmt::gen_statement,
    x86_64,
};

/// Output sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Text,
    Data,
    Bss,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::None => "none",
            Section::Text => ".text",
            Section::Data => ".data",
            Section::Bss => ".bss",
        }
    }
}

pub struct CodeGen<W: Write> {
    out: W,
    /// Section of the last emitted text
    pub section: Section,
    /// Next loop id
    pub loop_count: usize,
    /// Next conditional id
    pub if_count: usize,
    /// Ids of the loops currently open, innermost last
    pub loops: Vec<usize>,
    /// Ids of the conditionals currently open, innermost last
    pub ifs: Vec<usize>,
    regs: RegisterPool,
}

impl<W: Write> CodeGen<W> {
    pub fn new(out: W) -> Self {
        CodeGen {
            out,
            section: Section::None,
            loop_count: 0,
            if_count: 0,
            loops: Vec::new(),
            ifs: Vec::new(),
            regs: RegisterPool::new(),
        }
    }

    /// Lowers a completed subtree.
    pub fn compile_node(&mut self, state: &CompilerState, node: NodeId) -> Result<(), Error> {
        gen_statement(self, state, node)
    }

    /// Appends text to the output.
    pub fn emit(&mut self, state: &CompilerState, text: &str) -> Result<(), Error> {
        self.out.write_all(text.as_bytes()).map_err(|error| {
            Error::new(
                ErrorImpl::Io {
                    message: error.to_string(),
                },
                state.position(),
            )
        })
    }

    /// Switches to `section` unless it is already the current one.
    pub fn ensure_section(&mut self, state: &CompilerState, section: Section) -> Result<(), Error> {
        if self.section == section {
            return Ok(());
        }

        debug!("switching to section {}", section.name());
        self.emit(state, &x86_64::section(section))?;
        self.section = section;
        Ok(())
    }

    /// Runs `f` with a scratch register that is released however `f` returns.
    pub fn with_register<F>(&mut self, state: &CompilerState, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self, Register) -> Result<(), Error>,
    {
        let reg = self
            .regs
            .alloc()
            .ok_or_else(|| Error::new(ErrorImpl::RegistersExhausted, state.position()))?;

        let result = f(self, reg);
        self.regs.free(reg);
        result
    }

    pub fn registers_in_use(&self) -> usize {
        self.regs.in_use()
    }

    pub fn flush(&mut self, state: &CompilerState) -> Result<(), Error> {
        self.out.flush().map_err(|error| {
            Error::new(
                ErrorImpl::Io {
                    message: error.to_string(),
                },
                state.position(),
            )
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
