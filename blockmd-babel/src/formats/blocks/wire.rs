//! Serde shapes of the platform's block JSON and their mapping to the arena.
//!
//! Everything duck-typed about the platform payload is settled here: block
//! type detection, style flag reduction, field aliases, URL decoding and root
//! resolution. Past this module the rest of the crate only sees
//! [`BlockKind`] and [`Run`].

use crate::common::language::language_code;
use crate::common::url::{safe_decode, safe_encode};
use crate::ir::nodes::{
    BlockKind, CodeLanguage, Document, FlatDocument, MergeSpan, NodeId, Run, RunStyle, Table,
    TableGrid, TableProperty, TextBody,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A block tree as read from the platform. Blocks stay raw until decoded one by one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireInput {
    #[serde(default)]
    pub metadata: Option<WireMetadata>,
    #[serde(default)]
    pub document: Option<WireMetadata>,
    #[serde(default)]
    pub blocks: Value,
}

/// A linked tree, ready for whole-document creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireTree {
    pub metadata: WireMetadata,
    pub blocks: Vec<WireBlock>,
}

/// Unlinked blocks for appending into an existing container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireFlat {
    pub title: String,
    pub blocks: Vec<WireBlock>,
}

/// A subtree to create in one call: the top-level ids plus every block below them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireDescendants {
    pub children_id: Vec<String>,
    pub descendants: Vec<WireBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading1: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading2: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading3: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading4: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading5: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading6: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading7: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading8: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading9: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo: Option<WireTextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divider: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<WireImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<WireTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_cell: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_container: Option<Value>,

    /// Raw cell grid of a table that still has to be expanded into real cells.
    #[serde(rename = "_table", default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<WireGrid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTextBlock {
    #[serde(default)]
    pub style: WireBlockStyle,
    #[serde(default)]
    pub elements: Vec<WireTextElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireBlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<WireLanguage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireLanguage {
    Code(u32),
    Name(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTextElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<WireTextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention_user: Option<WireMentionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention_doc: Option<WireMentionDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation: Option<WireEquation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTextRun {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub text_element_style: WireTextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTextStyle {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inline_code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<WireLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireLink {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireMentionUser {
    #[serde(default, alias = "userId")]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireMentionDoc {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireEquation {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireImage {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTable {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<String>,
    #[serde(default)]
    pub property: WireTableProperty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTableProperty {
    #[serde(default, alias = "rowSize")]
    pub row_size: usize,
    #[serde(default, alias = "columnSize")]
    pub column_size: usize,
    #[serde(default, alias = "headerRow")]
    pub header_row: bool,
    #[serde(default, alias = "headerColumn")]
    pub header_column: bool,
    #[serde(default, alias = "columnWidth", skip_serializing_if = "Vec::is_empty")]
    pub column_width: Vec<u32>,
    #[serde(default, alias = "mergeInfo", skip_serializing_if = "Vec::is_empty")]
    pub merge_info: Vec<WireMergeInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMergeInfo {
    #[serde(default = "one", alias = "rowSpan")]
    pub row_span: usize,
    #[serde(default = "one", alias = "colSpan")]
    pub col_span: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireGrid {
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

impl WireBlock {
    fn heading(&self, level: u8) -> Option<&WireTextBlock> {
        match level {
            1 => self.heading1.as_ref(),
            2 => self.heading2.as_ref(),
            3 => self.heading3.as_ref(),
            4 => self.heading4.as_ref(),
            5 => self.heading5.as_ref(),
            6 => self.heading6.as_ref(),
            7 => self.heading7.as_ref(),
            8 => self.heading8.as_ref(),
            9 => self.heading9.as_ref(),
            _ => None,
        }
    }

    /// Type tag from the explicit `block_type`, else from the first payload key present.
    fn detect_type(&self) -> Option<u32> {
        if self.block_type.is_some() {
            return self.block_type;
        }
        let present = [
            (1, self.page.is_some()),
            (2, self.text.is_some()),
            (3, self.heading1.is_some()),
            (4, self.heading2.is_some()),
            (5, self.heading3.is_some()),
            (6, self.heading4.is_some()),
            (7, self.heading5.is_some()),
            (8, self.heading6.is_some()),
            (9, self.heading7.is_some()),
            (10, self.heading8.is_some()),
            (11, self.heading9.is_some()),
            (12, self.bullet.is_some()),
            (13, self.ordered.is_some()),
            (14, self.code.is_some()),
            (15, self.quote.is_some()),
            (17, self.todo.is_some()),
            (22, self.divider.is_some()),
            (27, self.image.is_some()),
            (31, self.table.is_some()),
            (32, self.table_cell.is_some()),
            (34, self.quote_container.is_some()),
        ];
        present
            .into_iter()
            .find_map(|(tag, found)| found.then_some(tag))
    }

    fn kind(&self) -> BlockKind {
        let block_type = self.detect_type();
        match block_type {
            Some(1) => BlockKind::Page(text_body(self.page.as_ref())),
            Some(2) => BlockKind::Text(text_body(self.text.as_ref())),
            Some(tag @ 3..=11) => {
                let level = (tag - 2) as u8;
                BlockKind::heading(level, text_body(self.heading(level)))
            }
            Some(12) => BlockKind::Bullet(text_body(self.bullet.as_ref())),
            Some(13) => BlockKind::Ordered(text_body(self.ordered.as_ref())),
            Some(14) => {
                let style = self.code.as_ref().map(|c| &c.style);
                BlockKind::Code {
                    body: text_body(self.code.as_ref()),
                    language: style.and_then(|s| s.language.as_ref()).map(|l| match l {
                        WireLanguage::Code(code) => CodeLanguage::Code(*code),
                        WireLanguage::Name(name) => CodeLanguage::Name(name.clone()),
                    }),
                    wrap: style.and_then(|s| s.wrap).unwrap_or(false),
                }
            }
            Some(15) => BlockKind::Quote(text_body(self.quote.as_ref())),
            Some(17) => BlockKind::Todo {
                body: text_body(self.todo.as_ref()),
                done: self
                    .todo
                    .as_ref()
                    .and_then(|t| t.style.done)
                    .unwrap_or(false),
            },
            Some(22) => BlockKind::Divider,
            Some(27) => BlockKind::Image {
                token: self
                    .image
                    .as_ref()
                    .map(|i| i.token.clone())
                    .unwrap_or_default(),
            },
            Some(31) => BlockKind::Table(self.table_payload()),
            Some(32) => BlockKind::TableCell,
            Some(34) => BlockKind::QuoteContainer,
            other => BlockKind::Unknown { block_type: other },
        }
    }

    fn table_payload(&self) -> Table {
        let property = self.table.as_ref().map(|t| &t.property);
        Table {
            property: property
                .map(|p| TableProperty {
                    row_size: p.row_size,
                    column_size: p.column_size,
                    header_row: p.header_row,
                    header_column: p.header_column,
                    column_width: p.column_width.clone(),
                    merge_info: p
                        .merge_info
                        .iter()
                        .map(|m| MergeSpan::new(m.row_span, m.col_span))
                        .collect(),
                })
                .unwrap_or_default(),
            grid: self
                .grid
                .as_ref()
                .map(|g| TableGrid::from_rows(g.rows.clone())),
        }
    }

    /// Child ids. Tables fall back to their `cells` list when `children` is empty.
    fn child_ids(&self) -> &[String] {
        match &self.table {
            Some(table) if self.children.is_empty() => &table.cells,
            _ => &self.children,
        }
    }
}

fn text_body(payload: Option<&WireTextBlock>) -> TextBody {
    let Some(payload) = payload else {
        return TextBody::default();
    };
    TextBody {
        runs: payload.elements.iter().map(element_run).collect(),
        align: payload.style.align,
        folded: payload.style.folded,
    }
}

fn element_run(element: &WireTextElement) -> Run {
    if let Some(run) = &element.text_run {
        return Run::styled(run.content.clone(), reduce_style(&run.text_element_style));
    }
    if let Some(user) = &element.mention_user {
        return Run::MentionUser {
            user_id: user.user_id.clone(),
        };
    }
    if let Some(doc) = &element.mention_doc {
        return Run::MentionDoc {
            title: doc.title.clone(),
            url: safe_decode(&doc.url),
        };
    }
    if let Some(equation) = &element.equation {
        return Run::Equation {
            content: equation.content.clone(),
        };
    }
    Run::Unrecognized
}

/// One style per run: the first flag set, in priority order, wins.
fn reduce_style(style: &WireTextStyle) -> RunStyle {
    if style.bold {
        RunStyle::Bold
    } else if style.italic {
        RunStyle::Italic
    } else if style.strikethrough {
        RunStyle::Strikethrough
    } else if style.underline {
        RunStyle::Underline
    } else if style.inline_code {
        RunStyle::InlineCode
    } else {
        match &style.link {
            Some(link) if !link.url.is_empty() => RunStyle::Link(safe_decode(&link.url)),
            _ => RunStyle::Plain,
        }
    }
}

/// Build the arena from platform JSON. Never fails.
///
/// Blocks that do not decode are skipped. The root is the block named by the
/// metadata (or document) id, else the first page block, else the first
/// block. Parents are assigned by a breadth-first walk from the root; a block
/// already claimed is not attached twice, and unreachable blocks stay detached.
/// A table cell that cannot be attached is replaced by an empty cell, so
/// every cell keeps its row-major position.
pub fn ingest(input: WireInput) -> Document {
    let raw = match input.blocks {
        Value::Array(blocks) => blocks,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(kind = %json_kind(&other), "`blocks` is not an array, ignoring it");
            Vec::new()
        }
    };

    let mut doc = Document::new();
    let mut child_ids: Vec<Vec<String>> = Vec::new();
    let mut by_id: HashMap<String, NodeId> = HashMap::new();
    for (position, value) in raw.into_iter().enumerate() {
        let block: WireBlock = match serde_json::from_value(value) {
            Ok(block) => block,
            Err(error) => {
                tracing::warn!(position, error = %error, "skipping block that does not decode");
                continue;
            }
        };
        let id = block.block_id.clone().unwrap_or_default();
        let node = doc.push(id.clone(), block.kind());
        child_ids.push(block.child_ids().to_vec());
        if !id.is_empty() {
            by_id.insert(id, node);
        }
    }

    let metadata = input.metadata.unwrap_or_default();
    let named_root = metadata
        .document_id
        .as_deref()
        .or_else(|| input.document.as_ref().and_then(|d| d.document_id.as_deref()))
        .filter(|id| !id.is_empty())
        .and_then(|id| by_id.get(id).copied());
    let root = named_root
        .or_else(|| doc.iter().find(|(_, b)| b.kind.is_page()).map(|(n, _)| n))
        .or_else(|| doc.iter().next().map(|(n, _)| n));
    let Some(root) = root else {
        tracing::debug!("no blocks to ingest");
        return doc;
    };
    doc.set_root(root);

    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        let is_table = matches!(doc.get(node).kind, BlockKind::Table(_));
        for child_id in &child_ids[node.index()] {
            let attached = match by_id.get(child_id) {
                Some(&child) if doc.append_child(node, child) => {
                    queue.push_back(child);
                    true
                }
                Some(_) => {
                    tracing::warn!(parent = %doc.get(node).id, child = %child_id, "block already has a parent, not attaching it again");
                    false
                }
                None => {
                    tracing::debug!(parent = %doc.get(node).id, child = %child_id, "skipping missing child");
                    false
                }
            };
            // Cell position comes from the index, so an unresolved cell keeps an empty slot.
            if is_table && !attached {
                let slot = doc.push(child_id.clone(), BlockKind::TableCell);
                doc.append_child(node, slot);
            }
        }
    }

    let page_title = match &doc.get(root).kind {
        BlockKind::Page(body) => plain_text(&body.runs),
        _ => String::new(),
    };
    doc.revision_id = metadata.revision_id.unwrap_or_default();
    doc.title = metadata.title.unwrap_or(page_title);
    tracing::debug!(blocks = doc.len(), root = %doc.get(root).id, "ingested block tree");
    doc
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn plain_text(runs: &[Run]) -> String {
    runs.iter()
        .filter_map(|run| match run {
            Run::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

fn wire_style(style: &RunStyle) -> WireTextStyle {
    let mut wire = WireTextStyle::default();
    match style {
        RunStyle::Plain => {}
        RunStyle::Bold => wire.bold = true,
        RunStyle::Italic => wire.italic = true,
        RunStyle::Strikethrough => wire.strikethrough = true,
        RunStyle::Underline => wire.underline = true,
        RunStyle::InlineCode => wire.inline_code = true,
        RunStyle::Link(url) => {
            wire.link = Some(WireLink {
                url: safe_encode(url),
            })
        }
    }
    wire
}

fn wire_element(run: &Run) -> WireTextElement {
    match run {
        Run::Text { content, style } => WireTextElement {
            text_run: Some(WireTextRun {
                content: content.clone(),
                text_element_style: wire_style(style),
            }),
            ..WireTextElement::default()
        },
        Run::MentionUser { user_id } => WireTextElement {
            mention_user: Some(WireMentionUser {
                user_id: user_id.clone(),
            }),
            ..WireTextElement::default()
        },
        Run::MentionDoc { title, url } => WireTextElement {
            mention_doc: Some(WireMentionDoc {
                title: title.clone(),
                url: safe_encode(url),
            }),
            ..WireTextElement::default()
        },
        Run::Equation { content } => WireTextElement {
            equation: Some(WireEquation {
                content: content.clone(),
            }),
            ..WireTextElement::default()
        },
        Run::Unrecognized => WireTextElement::default(),
    }
}

fn wire_text(body: &TextBody) -> WireTextBlock {
    let mut elements: Vec<WireTextElement> = body.runs.iter().map(wire_element).collect();
    if elements.is_empty() {
        elements.push(wire_element(&Run::plain("")));
    }
    WireTextBlock {
        style: WireBlockStyle {
            align: body.align,
            folded: body.folded,
            ..WireBlockStyle::default()
        },
        elements,
    }
}

fn wire_language(language: &CodeLanguage) -> Option<WireLanguage> {
    match language {
        CodeLanguage::Code(code) => Some(WireLanguage::Code(*code)),
        CodeLanguage::Name(name) if name.is_empty() => None,
        CodeLanguage::Name(name) => Some(
            language_code(name)
                .map(WireLanguage::Code)
                .unwrap_or_else(|| WireLanguage::Name(name.clone())),
        ),
    }
}

fn wire_table_property(property: &TableProperty) -> WireTableProperty {
    WireTableProperty {
        row_size: property.row_size,
        column_size: property.column_size,
        header_row: property.header_row,
        header_column: property.header_column,
        column_width: property.column_width.clone(),
        merge_info: property
            .merge_info
            .iter()
            .map(|m| WireMergeInfo {
                row_span: m.row_span,
                col_span: m.col_span,
            })
            .collect(),
    }
}

/// Payload fields for one block. Ids and links are filled in by the caller.
fn wire_payload(kind: &BlockKind) -> WireBlock {
    let mut block = WireBlock {
        block_type: kind.block_type(),
        ..WireBlock::default()
    };
    match kind {
        BlockKind::Page(body) => block.page = Some(wire_text(body)),
        BlockKind::Text(body) => block.text = Some(wire_text(body)),
        BlockKind::Heading { level, body } => {
            let payload = Some(wire_text(body));
            match level {
                1 => block.heading1 = payload,
                2 => block.heading2 = payload,
                3 => block.heading3 = payload,
                4 => block.heading4 = payload,
                5 => block.heading5 = payload,
                6 => block.heading6 = payload,
                7 => block.heading7 = payload,
                8 => block.heading8 = payload,
                _ => block.heading9 = payload,
            }
        }
        BlockKind::Bullet(body) => block.bullet = Some(wire_text(body)),
        BlockKind::Ordered(body) => block.ordered = Some(wire_text(body)),
        BlockKind::Code {
            body,
            language,
            wrap,
        } => {
            let mut payload = wire_text(body);
            payload.style.language = language.as_ref().and_then(wire_language);
            payload.style.wrap = wrap.then_some(true);
            block.code = Some(payload);
        }
        BlockKind::Quote(body) => block.quote = Some(wire_text(body)),
        BlockKind::Todo { body, done } => {
            let mut payload = wire_text(body);
            payload.style.done = Some(*done);
            block.todo = Some(payload);
        }
        BlockKind::Divider => block.divider = Some(Value::Object(Default::default())),
        BlockKind::Image { token } => {
            block.image = Some(WireImage {
                token: token.clone(),
            })
        }
        BlockKind::Table(table) => {
            block.table = Some(WireTable {
                cells: Vec::new(),
                property: wire_table_property(&table.property),
            });
            block.grid = table.grid.as_ref().map(|grid| WireGrid {
                rows: grid.rows().to_vec(),
            });
        }
        BlockKind::TableCell => block.table_cell = Some(Value::Object(Default::default())),
        BlockKind::QuoteContainer => {
            block.quote_container = Some(Value::Object(Default::default()))
        }
        BlockKind::Unknown { .. } => {}
    }
    block
}

fn wire_linked(doc: &Document, node: NodeId) -> WireBlock {
    let block = doc.get(node);
    let mut wire = wire_payload(&block.kind);
    wire.block_id = Some(block.id.clone());
    wire.parent_id = Some(
        block
            .parent
            .map(|parent| doc.get(parent).id.clone())
            .unwrap_or_default(),
    );
    wire.children = doc
        .children(node)
        .iter()
        .map(|&child| doc.get(child).id.clone())
        .collect();
    if let Some(table) = wire.table.as_mut() {
        table.cells = wire.children.clone();
    }
    wire
}

/// Emit the tree reachable from the root, in pre-order.
pub fn emit_tree(doc: &Document) -> WireTree {
    let Some(root) = doc.root() else {
        return WireTree {
            metadata: WireMetadata::default(),
            blocks: Vec::new(),
        };
    };
    WireTree {
        metadata: WireMetadata {
            document_id: Some(doc.get(root).id.clone()),
            revision_id: Some(doc.revision_id),
            title: Some(doc.title.clone()),
        },
        blocks: doc
            .descendants(root)
            .into_iter()
            .map(|node| wire_linked(doc, node))
            .collect(),
    }
}

pub fn emit_flat(flat: &FlatDocument) -> WireFlat {
    WireFlat {
        title: flat.title.clone(),
        blocks: flat.blocks.iter().map(wire_payload).collect(),
    }
}

/// Emit a subtree rooted at `doc.root()` for a single create-descendants call.
pub fn emit_descendants(doc: &Document) -> WireDescendants {
    let Some(root) = doc.root() else {
        return WireDescendants {
            children_id: Vec::new(),
            descendants: Vec::new(),
        };
    };
    let mut descendants: Vec<WireBlock> = doc
        .descendants(root)
        .into_iter()
        .map(|node| wire_linked(doc, node))
        .collect();
    if let Some(top) = descendants.first_mut() {
        top.parent_id = None;
    }
    WireDescendants {
        children_id: vec![doc.get(root).id.clone()],
        descendants,
    }
}
