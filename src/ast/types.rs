//! Type definitions shared by the symbol table, parser and code generator.
//!
//! A [`DatumType`] is a base kind with two orthogonal modifiers: pointer
//! depth and array element count. Sizes are derived from the base kind only.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// Represents the built-in base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseType {
    #[default]
    Invalid,
    Void,
    U8,
    U16,
    U32,
    U64,
}

impl BaseType {
    /// Maps a type keyword to its base type; anything else is `Invalid`.
    pub fn from_token(kind: TokenKind) -> BaseType {
        match kind {
            TokenKind::Void => BaseType::Void,
            TokenKind::U8 => BaseType::U8,
            TokenKind::U16 => BaseType::U16,
            TokenKind::U32 => BaseType::U32,
            TokenKind::U64 | TokenKind::UPtr => BaseType::U64,
            _ => BaseType::Invalid,
        }
    }

    /// Size in bytes, zero for types that occupy no storage.
    pub fn size(&self) -> usize {
        match self {
            BaseType::Invalid | BaseType::Void => 0,
            BaseType::U8 => 1,
            BaseType::U16 => 2,
            BaseType::U32 => 4,
            BaseType::U64 => 8,
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BaseType::Invalid => "<invalid>",
            BaseType::Void => "void",
            BaseType::U8 => "u8",
            BaseType::U16 => "u16",
            BaseType::U32 => "u32",
            BaseType::U64 => "u64",
        };
        write!(f, "{}", name)
    }
}

/// Machine operand sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineSize {
    Byte,
    Word,
    Dword,
    Qword,
}

impl MachineSize {
    pub fn from_base(base: BaseType) -> Option<MachineSize> {
        match base {
            BaseType::U8 => Some(MachineSize::Byte),
            BaseType::U16 => Some(MachineSize::Word),
            BaseType::U32 => Some(MachineSize::Dword),
            BaseType::U64 => Some(MachineSize::Qword),
            BaseType::Invalid | BaseType::Void => None,
        }
    }

    /// Whether `value` can be stored in this size, read as either signed or unsigned.
    pub fn fits(&self, value: i64) -> bool {
        match self {
            MachineSize::Byte => (i8::MIN as i64..=u8::MAX as i64).contains(&value),
            MachineSize::Word => (i16::MIN as i64..=u16::MAX as i64).contains(&value),
            MachineSize::Dword => (i32::MIN as i64..=u32::MAX as i64).contains(&value),
            MachineSize::Qword => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatumType {
    pub base: BaseType,
    pub ptr_depth: usize,
    /// Element count, zero when the type is not an array.
    pub array_size: usize,
}

impl DatumType {
    pub fn new(base: BaseType) -> Self {
        DatumType {
            base,
            ptr_depth: 0,
            array_size: 0,
        }
    }

    pub fn is_array(&self) -> bool {
        self.array_size > 0
    }

    pub fn machine_size(&self) -> Option<MachineSize> {
        MachineSize::from_base(self.base)
    }

    /// Bytes of storage: the element size, times the element count for arrays.
    /// `None` when the total overflows.
    pub fn storage_size(&self) -> Option<usize> {
        if self.is_array() {
            self.base.size().checked_mul(self.array_size)
        } else {
            Some(self.base.size())
        }
    }
}

impl Display for DatumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base, "*".repeat(self.ptr_depth))?;
        if self.is_array() {
            write!(f, "[{}]", self.array_size)?;
        }
        Ok(())
    }
}
