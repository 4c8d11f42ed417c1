use crate::symbols::symbol::SymbolId;

/// Handle to a node inside an [`AstArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Syntax nodes.
///
/// Children are referenced by [`NodeId`] and each child has exactly one parent.
/// Nodes flagged `epilogue` are synthesized by the parser when a block closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Procedure entry.
    Proc { symbol: SymbolId },
    /// `return` from `proc`, or the synthetic return closing its body.
    Return {
        proc: SymbolId,
        value: Option<NodeId>,
        epilogue: bool,
    },
    InlineAsm { text: String },
    /// Loop entry, or the loop footer when `epilogue` is set.
    ///
    /// A footer with `reachable` unset follows a `return` and needs no back-jump.
    Loop { epilogue: bool, reachable: bool },
    Break,
    Continue,
    /// Conditional entry testing `condition`, or the conditional footer.
    If { condition: Option<NodeId>, epilogue: bool },
    Var { symbol: SymbolId },
    VarInit { symbol: SymbolId, value: NodeId },
    Assign { target: NodeId, value: NodeId },
    Call { symbol: SymbolId },
    /// Structure definition, or instance when the symbol has a parent.
    Struct { symbol: SymbolId },
    Symbol { symbol: SymbolId },
    Number { value: i64 },
    /// `base.field` where `field` indexes the field list of definition `owner`.
    FieldAccess { base: NodeId, owner: SymbolId, field: usize },
}

impl Node {
    pub fn name(&self) -> &'static str {
        match self {
            Node::Proc { .. } => "procedure",
            Node::Return { .. } => "return",
            Node::InlineAsm { .. } => "inline assembly",
            Node::Loop { .. } => "loop",
            Node::Break => "break",
            Node::Continue => "continue",
            Node::If { .. } => "if",
            Node::Var { .. } => "variable",
            Node::VarInit { .. } => "initialized variable",
            Node::Assign { .. } => "assignment",
            Node::Call { .. } => "call",
            Node::Struct { .. } => "structure",
            Node::Symbol { .. } => "symbol",
            Node::Number { .. } => "number",
            Node::FieldAccess { .. } => "field access",
        }
    }
}

/// Owns every node of a compilation unit; nodes are released together when it drops.
#[derive(Debug, Default)]
pub struct AstArena {
    nodes: Vec<Node>,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
