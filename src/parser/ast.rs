use crate::lexer::Position;
use std::fmt;

/// Kinds of nodes in the syntax tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Include,
    Define,
    IngredientVar,
    SpecialtyVar,
    Make,
    Size,
    Pizza,
    Add,
    Of,
    SaveAs,
    Path,
    Number,
    Literal,
    Resize,
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl NodeKind {
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            NodeKind::Plus | NodeKind::Minus | NodeKind::Multiply | NodeKind::Divide
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::Include => "INCLUDE",
            NodeKind::Define => "DEFINE",
            NodeKind::IngredientVar => "INGREDIENT_VAR",
            NodeKind::SpecialtyVar => "SPECIALTY_VAR",
            NodeKind::Make => "MAKE",
            NodeKind::Size => "SIZE",
            NodeKind::Pizza => "PIZZA",
            NodeKind::Add => "ADD",
            NodeKind::Of => "OF",
            NodeKind::SaveAs => "SAVE_AS",
            NodeKind::Path => "PATH",
            NodeKind::Number => "NUMBER",
            NodeKind::Literal => "LITERAL",
            NodeKind::Resize => "RESIZE",
            NodeKind::Plus => "PLUS",
            NodeKind::Minus => "MINUS",
            NodeKind::Multiply => "MULTIPLY",
            NodeKind::Divide => "DIVIDE",
        };
        write!(f, "{}", s)
    }
}

/// Index of a node inside its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node of the syntax tree
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub value: String,
    pub pos: Position,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl AstNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }
}

/// Arena holding every node of one unit's syntax tree.
///
/// A node owns its children through the arena; the parent link is a plain
/// index used only for walking upwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind, value: impl Into<String>, pos: Position) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AstNode {
            kind,
            value: value.into(),
            pos,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a node whose value is its kind name.
    pub fn alloc_structural(&mut self, kind: NodeKind, pos: Position) -> NodeId {
        self.alloc(kind, kind.to_string(), pos)
    }

    /// Make `child` the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.0].parent.is_none(), "node attached twice");
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// The PROGRAM node, once parsing has finished.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[id.0].children.get(index).copied()
    }

    /// First child.
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.child(id, 0)
    }

    /// Second child.
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.child(id, 1)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Topmost ancestor of `id`.
    pub fn ancestor_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Nearest descendants of `kind`: the matching direct children if there
    /// are any, otherwise the matches found under each child.
    pub fn find(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        let direct: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|&child| self.node(child).is(kind))
            .collect();

        if !direct.is_empty() {
            return direct;
        }

        self.children(id)
            .iter()
            .flat_map(|&child| self.find(child, kind))
            .collect()
    }

    fn fmt_node(&self, f: &mut fmt::Formatter, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        writeln!(
            f,
            "{}- [c:{}; f:{}] {}:{}",
            "\t".repeat(depth),
            node.pos.line,
            node.pos.column,
            node.kind,
            node.value
        )?;
        for &child in node.children() {
            self.fmt_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_node(f, root, 0),
            None => Ok(()),
        }
    }
}
