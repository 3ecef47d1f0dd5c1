//! Core data structures for the block model.
//!
//! A [`Document`] is an arena: blocks live in a dense vector and refer to each
//! other through [`NodeId`] indices. Platform ids are plain strings carried on
//! each [`Block`] and resolved to indices once, when the arena is built.

/// Index of a block inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the document's content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: String,
    pub parent: Option<NodeId>,
    pub kind: BlockKind,
    pub children: Vec<NodeId>,
}

/// The closed set of block types, each with its type-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Page(TextBody),
    Text(TextBody),
    /// Heading levels 1 to 9.
    Heading {
        level: u8,
        body: TextBody,
    },
    Bullet(TextBody),
    Ordered(TextBody),
    Code {
        body: TextBody,
        language: Option<CodeLanguage>,
        wrap: bool,
    },
    Quote(TextBody),
    Todo {
        body: TextBody,
        done: bool,
    },
    Divider,
    /// `token` is an opaque asset reference, not a URL.
    Image {
        token: String,
    },
    Table(Table),
    TableCell,
    QuoteContainer,
    /// Anything the ingestion boundary could not classify. Rendered as its children.
    Unknown {
        block_type: Option<u32>,
    },
}

impl BlockKind {
    /// Build a heading, clamping the level into `1..=9`.
    pub fn heading(level: u8, body: TextBody) -> Self {
        BlockKind::Heading {
            level: level.clamp(1, 9),
            body,
        }
    }

    /// The platform's numeric type tag for this block.
    pub fn block_type(&self) -> Option<u32> {
        let tag = match self {
            BlockKind::Page(_) => 1,
            BlockKind::Text(_) => 2,
            BlockKind::Heading { level, .. } => 2 + u32::from((*level).clamp(1, 9)),
            BlockKind::Bullet(_) => 12,
            BlockKind::Ordered(_) => 13,
            BlockKind::Code { .. } => 14,
            BlockKind::Quote(_) => 15,
            BlockKind::Todo { .. } => 17,
            BlockKind::Divider => 22,
            BlockKind::Image { .. } => 27,
            BlockKind::Table(_) => 31,
            BlockKind::TableCell => 32,
            BlockKind::QuoteContainer => 34,
            BlockKind::Unknown { block_type } => return *block_type,
        };
        Some(tag)
    }

    /// Inline content carried by text-like blocks.
    pub fn body(&self) -> Option<&TextBody> {
        match self {
            BlockKind::Page(body)
            | BlockKind::Text(body)
            | BlockKind::Bullet(body)
            | BlockKind::Ordered(body)
            | BlockKind::Quote(body)
            | BlockKind::Heading { body, .. }
            | BlockKind::Code { body, .. }
            | BlockKind::Todo { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self, BlockKind::Ordered(_))
    }

    pub fn is_page(&self) -> bool {
        matches!(self, BlockKind::Page(_))
    }
}

/// Inline runs plus the paragraph-level style shared by text-like blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBody {
    pub runs: Vec<Run>,
    pub align: Option<u8>,
    pub folded: Option<bool>,
}

impl TextBody {
    pub fn new(runs: Vec<Run>) -> Self {
        TextBody {
            runs,
            ..TextBody::default()
        }
    }

    /// A body holding a single unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        TextBody::new(vec![Run::plain(text)])
    }

    /// Set the paragraph style used for blocks created from Markdown.
    pub fn aligned(mut self, align: u8, folded: Option<bool>) -> Self {
        self.align = Some(align);
        self.folded = folded;
        self
    }
}

/// A span of inline content. Text runs carry at most one style.
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Text { content: String, style: RunStyle },
    MentionUser { user_id: String },
    MentionDoc { title: String, url: String },
    Equation { content: String },
    /// An element with no recognized payload; renders as nothing.
    Unrecognized,
}

impl Run {
    pub fn plain(content: impl Into<String>) -> Self {
        Run::Text {
            content: content.into(),
            style: RunStyle::Plain,
        }
    }

    pub fn styled(content: impl Into<String>, style: RunStyle) -> Self {
        Run::Text {
            content: content.into(),
            style,
        }
    }
}

/// The single style of a text run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    Strikethrough,
    Underline,
    InlineCode,
    /// Holds the decoded URL.
    Link(String),
}

/// Code block language: the platform's numeric code, or a fence tag read from Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeLanguage {
    Code(u32),
    Name(String),
}

/// Table payload. `grid` is only present on tables scanned in flat mode,
/// where the caller still has to expand the grid into real cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub property: TableProperty,
    pub grid: Option<TableGrid>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableProperty {
    pub row_size: usize,
    pub column_size: usize,
    pub header_row: bool,
    pub header_column: bool,
    pub column_width: Vec<u32>,
    /// One entry per cell, in the same row-major order as the cell list.
    pub merge_info: Vec<MergeSpan>,
}

/// Rectangular region anchored at a cell's own position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    pub row_span: usize,
    pub col_span: usize,
}

impl MergeSpan {
    pub fn new(row_span: usize, col_span: usize) -> Self {
        MergeSpan { row_span, col_span }
    }
}

impl Default for MergeSpan {
    fn default() -> Self {
        MergeSpan::new(1, 1)
    }
}

/// Rectangular matrix of cell text. Ragged input is padded with empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
    col_count: usize,
}

impl TableGrid {
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(col_count, String::new());
        }
        TableGrid { rows, col_count }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }
}

/// Document tree stored as an arena.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    blocks: Vec<Block>,
    root: Option<NodeId>,
    pub title: String,
    pub revision_id: i64,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Add a detached block to the arena.
    pub fn push(&mut self, id: impl Into<String>, kind: BlockKind) -> NodeId {
        let node = NodeId(self.blocks.len());
        self.blocks.push(Block {
            id: id.into(),
            parent: None,
            kind,
            children: Vec::new(),
        });
        node
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// Returns `false` (and changes nothing) when the child already has a
    /// parent, is the root, or is the parent itself: the arena stays a tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || Some(child) == self.root || self.blocks[child.0].parent.is_some() {
            return false;
        }
        self.blocks[child.0].parent = Some(parent);
        self.blocks[parent.0].children.push(child);
        true
    }

    pub fn set_root(&mut self, node: NodeId) {
        self.root = Some(node);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, node: NodeId) -> &Block {
        &self.blocks[node.0]
    }

    pub fn get_mut(&mut self, node: NodeId) -> &mut Block {
        &mut self.blocks[node.0]
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.blocks[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.blocks[node.0].parent
    }

    /// Look a block up by its platform id.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.blocks.iter().position(|b| b.id == id).map(NodeId)
    }

    /// 1-based number of an ordered item: ordered siblings before it, plus one.
    ///
    /// Non-ordered siblings neither reset nor advance the count; a block with
    /// no parent is always number 1.
    pub fn ordinal(&self, node: NodeId) -> usize {
        let Some(parent) = self.parent(node) else {
            return 1;
        };
        1 + self
            .children(parent)
            .iter()
            .take_while(|&&sibling| sibling != node)
            .filter(|&&sibling| self.get(sibling).kind.is_ordered())
            .count()
    }

    /// Blocks reachable from `node`, in pre-order (the node itself first).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Block)> {
        self.blocks.iter().enumerate().map(|(i, b)| (NodeId(i), b))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Unlinked blocks scanned from Markdown, meant for appending into an existing container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatDocument {
    pub title: String,
    pub blocks: Vec<BlockKind>,
}
