//! Bitmap allocator over the scratch registers.

use crate::ast::types::MachineSize;

pub const REGISTER_POOL: [&str; 8] = ["r8", "r9", "r10", "r11", "r12", "r13", "r14", "r15"];

/// Index into [`REGISTER_POOL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register(usize);

impl Register {
    /// Register name for an operand of `size`, e.g. `r9d` for a dword.
    pub fn name(&self, size: MachineSize) -> String {
        let base = REGISTER_POOL[self.0];
        match size {
            MachineSize::Byte => format!("{}b", base),
            MachineSize::Word => format!("{}w", base),
            MachineSize::Dword => format!("{}d", base),
            MachineSize::Qword => base.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RegisterPool {
    bitmap: u8,
}

impl RegisterPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the first free register.
    pub fn alloc(&mut self) -> Option<Register> {
        let index = (0..REGISTER_POOL.len()).find(|bit| self.bitmap & (1 << bit) == 0)?;
        self.bitmap |= 1 << index;
        Some(Register(index))
    }

    pub fn free(&mut self, reg: Register) {
        self.bitmap &= !(1 << reg.0);
    }

    pub fn in_use(&self) -> usize {
        self.bitmap.count_ones() as usize
    }
}
