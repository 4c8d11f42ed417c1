//! Stack of open block kinds.

use crate::errors::errors::ErrorImpl;

/// Maximum number of blocks that may be open at once.
pub const SCOPE_STACK_MAX: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeKind {
    #[default]
    None,
    Procedure,
    Loop,
    Conditional,
    Structure,
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    stack: [ScopeKind; SCOPE_STACK_MAX],
    depth: usize,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ScopeKind) -> Result<(), ErrorImpl> {
        if self.depth >= SCOPE_STACK_MAX {
            return Err(ErrorImpl::ScopeOverflow {
                max: SCOPE_STACK_MAX,
            });
        }

        self.stack[self.depth] = kind;
        self.depth += 1;
        Ok(())
    }

    /// Pops the innermost block kind.
    ///
    /// An empty stack yields whatever sits in slot zero (`ScopeKind::None`,
    /// since popped slots are cleared) instead of an error.
    pub fn pop(&mut self) -> ScopeKind {
        if self.depth == 0 {
            return self.stack[0];
        }

        self.depth -= 1;
        let scope = self.stack[self.depth];
        self.stack[self.depth] = ScopeKind::None;
        scope
    }

    /// Peeks at the innermost block kind, with the same empty-stack behaviour as [`ScopeStack::pop`].
    pub fn top(&self) -> ScopeKind {
        if self.depth == 0 {
            return self.stack[0];
        }

        self.stack[self.depth - 1]
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
