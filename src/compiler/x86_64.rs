//! NASM text for the x86-64 instructions and directives the generator uses.
//!
//! Every helper returns the complete text to append, newline included.

use crate::ast::types::MachineSize;

use super::{compiler::Section, regs::Register};

fn return_register(size: MachineSize) -> &'static str {
    match size {
        MachineSize::Byte => "al",
        MachineSize::Word => "ax",
        MachineSize::Dword => "eax",
        MachineSize::Qword => "rax",
    }
}

fn define_directive(size: MachineSize) -> &'static str {
    match size {
        MachineSize::Byte => "db",
        MachineSize::Word => "dw",
        MachineSize::Dword => "dd",
        MachineSize::Qword => "dq",
    }
}

fn size_keyword(size: MachineSize) -> &'static str {
    match size {
        MachineSize::Byte => "byte",
        MachineSize::Word => "word",
        MachineSize::Dword => "dword",
        MachineSize::Qword => "qword",
    }
}

pub fn section(section: Section) -> String {
    format!("[section {}]\n", section.name())
}

pub fn label(name: &str, is_global: bool) -> String {
    let mut text = String::new();
    if is_global {
        text.push_str(&format!("[global {}]\n", name));
    }
    text.push_str(&format!("{}:\n", name));
    text
}

pub fn ret() -> String {
    String::from("\tret\n")
}

pub fn ret_imm(size: MachineSize, imm: i64) -> String {
    format!("\tmov {}, {}\n\tret\n", return_register(size), imm)
}

pub fn inject(line: &str) -> String {
    format!("\t{}\n", line)
}

pub fn jmp(label: &str) -> String {
    format!("\tjmp {}\n", label)
}

pub fn call(name: &str) -> String {
    format!("\tcall {}\n", name)
}

/// A sized, initialized data slot.
pub fn global_var(name: &str, size: MachineSize, imm: i64, is_global: bool) -> String {
    let mut text = label_prefix(name, is_global);
    text.push_str(&format!("{}: {} {}\n", name, define_directive(size), imm));
    text
}

/// A zeroed run of `count` elements inside initialized data.
pub fn global_array(name: &str, size: MachineSize, count: usize, is_global: bool) -> String {
    let mut text = label_prefix(name, is_global);
    text.push_str(&format!(
        "{}: times {} {} 0\n",
        name,
        count,
        define_directive(size)
    ));
    text
}

/// `bytes` of uninitialized storage.
pub fn reserve(name: &str, bytes: usize, is_global: bool) -> String {
    let mut text = label_prefix(name, is_global);
    text.push_str(&format!("{}: resb {}\n", name, bytes));
    text
}

pub fn store_imm(label: &str, size: MachineSize, imm: i64) -> String {
    format!("\tmov {} [{}], {}\n", size_keyword(size), label, imm)
}

pub fn store_reg(label: &str, size: MachineSize, reg: Register) -> String {
    format!("\tmov {} [{}], {}\n", size_keyword(size), label, reg.name(size))
}

pub fn load_imm(reg: Register, imm: i64) -> String {
    format!("\tmov {}, {}\n", reg.name(MachineSize::Qword), imm)
}

/// Jumps to `label` when `reg` holds zero.
pub fn jump_if_zero(reg: Register, label: &str) -> String {
    let name = reg.name(MachineSize::Qword);
    format!("\tor {}, {}\n\tjz {}\n", name, name, label)
}

pub fn loop_label(id: usize) -> String {
    format!("L.{}", id)
}

pub fn loop_exit_label(id: usize) -> String {
    format!("L.{}.1", id)
}

pub fn if_label(id: usize) -> String {
    format!("I.{}", id)
}

fn label_prefix(name: &str, is_global: bool) -> String {
    if is_global {
        format!("[global {}]\n", name)
    } else {
        String::new()
    }
}
