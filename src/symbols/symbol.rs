//! Program symbols and the top-level symbol table.

use crate::ast::types::{BaseType, DatumType};

/// Identifies a top-level symbol. Ids are assigned in declaration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolKind {
    #[default]
    None,
    Variable,
    Function,
    Structure,
    Typedef,
}

/// A declared name.
///
/// Structures come in two flavours that share [`SymbolKind::Structure`]:
/// a definition owns the field list and has no parent, while an instance
/// (a variable or a nested field of structure type) names its definition
/// through `parent`.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    /// Index within the owning table, or within the owner's field list for fields.
    pub id: usize,
    pub kind: SymbolKind,
    pub datum: DatumType,
    pub is_global: bool,
    /// Definition this symbol instantiates. Not an owning link.
    pub parent: Option<SymbolId>,
    pub fields: Vec<Symbol>,
    /// Set once a structure definition's `{ ... }` body has been read, even an empty one.
    pub has_body: bool,
}

impl Symbol {
    fn new(name: &str, id: usize, base: BaseType) -> Self {
        Symbol {
            name: name.to_string(),
            id,
            kind: SymbolKind::None,
            datum: DatumType::new(base),
            is_global: false,
            parent: None,
            fields: Vec::new(),
            has_body: false,
        }
    }

    /// Appends a field with an id sequential within this symbol only.
    pub fn declare_field(&mut self, name: &str, base: BaseType) -> &mut Symbol {
        let id = self.fields.len();
        self.fields.push(Symbol::new(name, id, base));
        &mut self.fields[id]
    }

    pub fn lookup_field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field(&self, id: usize) -> Option<&Symbol> {
        self.fields.get(id)
    }

    pub fn is_structure_definition(&self) -> bool {
        self.kind == SymbolKind::Structure && self.parent.is_none()
    }

    pub fn is_structure_instance(&self) -> bool {
        self.kind == SymbolKind::Structure && self.parent.is_some()
    }
}

/// Append-only, insertion ordered collection of top-level symbols.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { symbols: Vec::new() }
    }

    /// Appends a symbol of kind `None` with the next sequential id.
    pub fn declare(&mut self, name: &str, base: BaseType) -> &mut Symbol {
        let id = self.symbols.len();
        self.symbols.push(Symbol::new(name, id, base));
        &mut self.symbols[id]
    }

    /// First symbol declared with `name`.
    pub fn lookup_by_name(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }

    pub fn lookup_by_id(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub fn lookup_by_id_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
