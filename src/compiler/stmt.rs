use std::io::Write;

use log::debug;

use crate::{
    ast::{
        ast::{Node, NodeId},
        types::{DatumType, MachineSize},
    },
    errors::errors::{Error, ErrorImpl},
    state::CompilerState,
    symbols::symbol::{Symbol, SymbolId, SymbolKind},
};

use super::{
    compiler::{CodeGen, Section},
    x86_64,
};

fn bad_node(state: &CompilerState, node: &str) -> Error {
    Error::new(
        ErrorImpl::BadNode {
            node: node.to_string(),
        },
        state.position(),
    )
}

fn get_node(state: &CompilerState, id: NodeId) -> Result<&Node, Error> {
    state
        .arena
        .get(id)
        .ok_or_else(|| bad_node(state, &format!("#{}", id.0)))
}

fn get_symbol(state: &CompilerState, id: SymbolId) -> Result<&Symbol, Error> {
    state
        .symtab
        .lookup_by_id(id)
        .ok_or_else(|| bad_node(state, &format!("with unbound symbol #{}", id.0)))
}

fn machine_size(state: &CompilerState, name: &str, datum: &DatumType) -> Result<MachineSize, Error> {
    datum.machine_size().ok_or_else(|| {
        Error::new(
            ErrorImpl::InvalidSize {
                name: name.to_string(),
            },
            state.position(),
        )
    })
}

fn check_range(state: &CompilerState, name: &str, size: MachineSize, value: i64) -> Result<(), Error> {
    if size.fits(value) {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::ValueOutOfRange {
            value,
            name: name.to_string(),
        },
        state.position(),
    ))
}

/// Value of a literal operand.
fn literal(state: &CompilerState, id: NodeId) -> Result<i64, Error> {
    match get_node(state, id)? {
        Node::Number { value } => Ok(*value),
        other => Err(bad_node(state, &format!("{} used as a literal", other.name()))),
    }
}

pub fn gen_statement<W: Write>(
    codegen: &mut CodeGen<W>,
    state: &CompilerState,
    id: NodeId,
) -> Result<(), Error> {
    let node = get_node(state, id)?;
    debug!("generating {} node", node.name());

    match node {
        Node::Proc { symbol } => {
            let symbol = get_symbol(state, *symbol)?;
            if symbol.kind != SymbolKind::Function {
                return Err(Error::new(
                    ErrorImpl::NotAFunction {
                        symbol: symbol.name.clone(),
                    },
                    state.position(),
                ));
            }

            codegen.ensure_section(state, Section::Text)?;
            codegen.emit(state, &x86_64::label(&symbol.name, symbol.is_global))
        }
        Node::Return { proc, value, epilogue } => gen_return(codegen, state, *proc, *value, *epilogue),
        Node::InlineAsm { text } => codegen.emit(state, &x86_64::inject(text)),
        Node::Loop { epilogue: false, .. } => {
            let id = codegen.loop_count;
            codegen.loop_count += 1;
            codegen.loops.push(id);

            codegen.ensure_section(state, Section::Text)?;
            codegen.emit(state, &x86_64::label(&x86_64::loop_label(id), false))
        }
        Node::Loop { epilogue: true, reachable } => {
            let id = codegen
                .loops
                .pop()
                .ok_or_else(|| bad_node(state, "loop footer without an open loop"))?;

            if *reachable {
                codegen.emit(state, &x86_64::jmp(&x86_64::loop_label(id)))?;
            }
            codegen.emit(state, &x86_64::label(&x86_64::loop_exit_label(id), false))
        }
        Node::Break | Node::Continue => {
            let id = codegen.loops.last().copied().ok_or_else(|| {
                Error::new(
                    ErrorImpl::NoEnclosingLoop {
                        statement: node.name().to_string(),
                    },
                    state.position(),
                )
            })?;

            let target = if let Node::Break = node {
                x86_64::loop_exit_label(id)
            } else {
                x86_64::loop_label(id)
            };
            codegen.emit(state, &x86_64::jmp(&target))
        }
        Node::If {
            condition: Some(condition),
            epilogue: false,
        } => {
            let value = literal(state, *condition)?;
            let id = codegen.if_count;
            codegen.if_count += 1;
            codegen.ifs.push(id);

            codegen.ensure_section(state, Section::Text)?;
            codegen.with_register(state, |codegen, reg| {
                codegen.emit(state, &x86_64::load_imm(reg, value))?;
                codegen.emit(state, &x86_64::jump_if_zero(reg, &x86_64::if_label(id)))
            })
        }
        Node::If { epilogue: true, .. } => {
            let id = codegen
                .ifs
                .pop()
                .ok_or_else(|| bad_node(state, "if footer without an open conditional"))?;
            codegen.emit(state, &x86_64::label(&x86_64::if_label(id), false))
        }
        Node::Var { symbol } => gen_global_var(codegen, state, *symbol, 0),
        Node::VarInit { symbol, value } => {
            let value = literal(state, *value)?;
            gen_global_var(codegen, state, *symbol, value)
        }
        Node::Assign { target, value } => gen_assignment(codegen, state, *target, *value),
        Node::Call { symbol } => {
            let symbol = get_symbol(state, *symbol)?;
            if symbol.kind != SymbolKind::Function {
                return Err(Error::new(
                    ErrorImpl::NotAFunction {
                        symbol: symbol.name.clone(),
                    },
                    state.position(),
                ));
            }

            codegen.ensure_section(state, Section::Text)?;
            codegen.emit(state, &x86_64::call(&symbol.name))
        }
        Node::Struct { symbol } => {
            let symbol = get_symbol(state, *symbol)?;
            match symbol.parent {
                // Definitions only describe a layout.
                None => Ok(()),
                Some(definition) => {
                    gen_struct_slots(codegen, state, &symbol.name, definition, symbol.is_global)
                }
            }
        }
        other => Err(bad_node(state, other.name())),
    }
}

fn gen_return<W: Write>(
    codegen: &mut CodeGen<W>,
    state: &CompilerState,
    proc: SymbolId,
    value: Option<NodeId>,
    epilogue: bool,
) -> Result<(), Error> {
    match value {
        Some(value) => {
            let imm = literal(state, value)?;
            let proc = get_symbol(state, proc)?;
            let size = machine_size(state, &proc.name, &proc.datum)?;
            check_range(state, &proc.name, size, imm)?;
            codegen.emit(state, &x86_64::ret_imm(size, imm))
        }
        None if epilogue => codegen.emit(state, &x86_64::ret()),
        None => Err(Error::new(
            ErrorImpl::NotImplementedError {
                feature: String::from("return without a value"),
            },
            state.position(),
        )),
    }
}

fn gen_global_var<W: Write>(
    codegen: &mut CodeGen<W>,
    state: &CompilerState,
    symbol: SymbolId,
    value: i64,
) -> Result<(), Error> {
    let symbol = get_symbol(state, symbol)?;
    let size = machine_size(state, &symbol.name, &symbol.datum)?;

    if symbol.datum.is_array() {
        let bytes = symbol.datum.storage_size().ok_or_else(|| {
            Error::new(
                ErrorImpl::ArrayTooLarge {
                    name: symbol.name.clone(),
                },
                state.position(),
            )
        })?;
        codegen.ensure_section(state, Section::Bss)?;
        return codegen.emit(state, &x86_64::reserve(&symbol.name, bytes, symbol.is_global));
    }

    check_range(state, &symbol.name, size, value)?;
    codegen.ensure_section(state, Section::Data)?;
    codegen.emit(
        state,
        &x86_64::global_var(&symbol.name, size, value, symbol.is_global),
    )
}

/// One zeroed slot per scalar field, named `<prefix>.<field>`, recursing into nested structures.
fn gen_struct_slots<W: Write>(
    codegen: &mut CodeGen<W>,
    state: &CompilerState,
    prefix: &str,
    definition: SymbolId,
    is_global: bool,
) -> Result<(), Error> {
    let definition = get_symbol(state, definition)?;

    for field in definition.fields.iter() {
        let name = format!("{}.{}", prefix, field.name);

        if let Some(nested) = field.parent {
            gen_struct_slots(codegen, state, &name, nested, is_global)?;
            continue;
        }

        let size = machine_size(state, &name, &field.datum)?;
        codegen.ensure_section(state, Section::Data)?;
        let text = if field.datum.is_array() {
            x86_64::global_array(&name, size, field.datum.array_size, is_global)
        } else {
            x86_64::global_var(&name, size, 0, is_global)
        };
        codegen.emit(state, &text)?;
    }

    Ok(())
}

/// Storage label and type of an assignment target.
fn resolve_target(state: &CompilerState, target: NodeId) -> Result<(String, DatumType), Error> {
    match get_node(state, target)? {
        Node::Symbol { symbol } => {
            let symbol = get_symbol(state, *symbol)?;
            if symbol.kind != SymbolKind::Variable {
                return Err(Error::new(
                    ErrorImpl::NotAVariable {
                        symbol: symbol.name.clone(),
                    },
                    state.position(),
                ));
            }
            Ok((symbol.name.clone(), symbol.datum))
        }
        Node::FieldAccess { base, owner, field } => {
            let (prefix, _) = resolve_chain_base(state, *base)?;
            let owner = get_symbol(state, *owner)?;
            let field = owner
                .field(*field)
                .ok_or_else(|| bad_node(state, "field access to a missing field"))?;
            Ok((format!("{}.{}", prefix, field.name), field.datum))
        }
        other => Err(bad_node(state, &format!("{} used as an assignment target", other.name()))),
    }
}

/// Like [`resolve_target`] but accepts structure instances, which only appear inside a chain.
fn resolve_chain_base(state: &CompilerState, base: NodeId) -> Result<(String, DatumType), Error> {
    match get_node(state, base)? {
        Node::Symbol { symbol } => {
            let symbol = get_symbol(state, *symbol)?;
            Ok((symbol.name.clone(), symbol.datum))
        }
        _ => resolve_target(state, base),
    }
}

fn gen_assignment<W: Write>(
    codegen: &mut CodeGen<W>,
    state: &CompilerState,
    target: NodeId,
    value: NodeId,
) -> Result<(), Error> {
    let imm = literal(state, value)?;
    let (label, datum) = resolve_target(state, target)?;
    let size = machine_size(state, &label, &datum)?;
    check_range(state, &label, size, imm)?;

    codegen.ensure_section(state, Section::Text)?;
    if size != MachineSize::Qword {
        return codegen.emit(state, &x86_64::store_imm(&label, size, imm));
    }

    // No 64-bit immediate form for memory stores.
    codegen.with_register(state, |codegen, reg| {
        codegen.emit(state, &x86_64::load_imm(reg, imm))?;
        codegen.emit(state, &x86_64::store_reg(&label, size, reg))
    })
}
