//! Markdown rendering (blocks → Markdown)
//!
//! Walks the arena from the root. Each block renders to a group of lines and
//! containers splice their children's lines in order. The final text never
//! holds more than one blank line in a row and ends with exactly one newline.

use super::inline::render_runs;
use super::table::render_html_table;
use crate::common::language::fence_tag;
use crate::ir::nodes::{BlockKind, Document, NodeId, Table, TextBody};
use once_cell::sync::Lazy;
use regex::Regex;

/// Nesting deeper than this is not rendered.
const MAX_DEPTH: usize = 256;

/// Separator between the blocks of one table cell.
const CELL_BREAK: &str = "<br/>";

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

/// Render the document rooted at `doc.root()`.
///
/// A document without a root renders as an empty string.
pub fn serialize_to_markdown(doc: &Document) -> String {
    let Some(root) = doc.root() else {
        return String::new();
    };
    let rendered = Renderer { doc }.block(root, 0, 0);
    let collapsed = BLANK_RUN.replace_all(&rendered, "\n\n");
    format!("{}\n", collapsed.trim_end_matches('\n'))
}

struct Renderer<'a> {
    doc: &'a Document,
}

impl Renderer<'_> {
    fn block(&self, node: NodeId, indent: usize, depth: usize) -> String {
        if depth > MAX_DEPTH {
            tracing::warn!(block = %self.doc.get(node).id, "block nesting too deep, truncating");
            return String::new();
        }
        let block = self.doc.get(node);
        tracing::trace!(block = %block.id, kind = ?block.kind.block_type(), "rendering");
        let pad = "  ".repeat(indent);
        let mut lines: Vec<String> = Vec::new();

        match &block.kind {
            BlockKind::Page(body) => {
                lines.push(trimmed(format!("# {}", render_runs(&body.runs))));
                lines.push("---".to_string());
                self.children(node, &mut lines, indent, depth);
            }
            BlockKind::Text(body) => {
                let line = format!("{pad}{}", render_runs(&body.runs));
                let line = line.trim_end_matches([' ', '\t']);
                if line.trim().is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("{line}  "));
                }
            }
            BlockKind::Heading { level, body } => {
                let hashes = "#".repeat(usize::from(*level));
                lines.push(trimmed(format!("{hashes} {}", render_runs(&body.runs))));
                self.children(node, &mut lines, indent, depth);
            }
            BlockKind::Bullet(body) => {
                lines.push(trimmed(format!("{pad}- {}", render_runs(&body.runs))));
                self.children(node, &mut lines, indent + 1, depth);
            }
            BlockKind::Ordered(body) => {
                let number = self.doc.ordinal(node);
                lines.push(trimmed(format!("{pad}{number}. {}", render_runs(&body.runs))));
                self.children(node, &mut lines, indent + 1, depth);
            }
            BlockKind::Code { body, language, .. } => {
                lines.push(trimmed(format!("```{}", fence_tag(language.as_ref()))));
                lines.push(render_runs(&body.runs).trim_end_matches('\n').to_string());
                lines.push("```".to_string());
            }
            BlockKind::Quote(body) => {
                for line in render_runs(&body.runs).split('\n') {
                    lines.push(trimmed(format!("{pad}> {line}")));
                }
            }
            BlockKind::Todo { body, done } => {
                let mark = if *done { 'x' } else { ' ' };
                lines.push(trimmed(format!("{pad}- [{mark}] {}", render_runs(&body.runs))));
            }
            BlockKind::Divider => lines.push(format!("{pad}---")),
            BlockKind::Image { token } => lines.push(trimmed(format!("{pad}![]({token})"))),
            BlockKind::Table(table) => lines.push(self.table(node, table, depth)),
            BlockKind::TableCell => lines.push(self.table_cell(node, depth)),
            BlockKind::QuoteContainer => {
                for &child in self.doc.children(node) {
                    for line in self.block(child, indent, depth + 1).split('\n') {
                        if line.is_empty() {
                            lines.push(">".to_string());
                        } else {
                            lines.push(format!("> {line}"));
                        }
                    }
                }
            }
            BlockKind::Unknown { .. } => self.children(node, &mut lines, indent, depth),
        }

        lines.join("\n")
    }

    /// Render children in order. Consecutive blank text blocks collapse into one blank line.
    fn children(&self, node: NodeId, lines: &mut Vec<String>, indent: usize, depth: usize) {
        for &child in self.doc.children(node) {
            if is_blank_text(&self.doc.get(child).kind) {
                if lines.last().map_or(true, |last| !last.is_empty()) {
                    lines.push(String::new());
                }
                continue;
            }
            let rendered = self.block(child, indent, depth + 1);
            if !rendered.is_empty() {
                lines.push(rendered);
            }
        }
    }

    fn table(&self, node: NodeId, table: &Table, depth: usize) -> String {
        let columns = table.property.column_size;
        let cells: Vec<String> = match (&table.grid, self.doc.children(node)) {
            (Some(grid), []) => grid.rows().iter().flatten().cloned().collect(),
            (_, children) => children
                .iter()
                .map(|&cell| self.table_cell(cell, depth + 1).replace('\n', ""))
                .collect(),
        };
        render_html_table(&cells, &table.property.merge_info, columns)
    }

    fn table_cell(&self, node: NodeId, depth: usize) -> String {
        self.doc
            .children(node)
            .iter()
            .map(|&child| self.block(child, 0, depth + 1).trim_end().to_string())
            .collect::<Vec<_>>()
            .join(CELL_BREAK)
    }
}

fn trimmed(line: String) -> String {
    line.trim_end().to_string()
}

fn is_blank_text(kind: &BlockKind) -> bool {
    match kind {
        BlockKind::Text(TextBody { runs, .. }) => render_runs(runs).trim().is_empty(),
        _ => false,
    }
}
