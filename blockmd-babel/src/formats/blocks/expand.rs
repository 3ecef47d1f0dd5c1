//! Table expansion: a cell-text grid becomes a table block with real cells.
//!
//! The platform only accepts tables as a subtree, table → table_cell → text,
//! with a column width per column. Widths follow the widest cell in each column.

use crate::formats::markdown::inline::parse_inline;
use crate::ir::ids::IdGen;
use crate::ir::nodes::{BlockKind, Document, NodeId, Table, TableGrid, TableProperty, TextBody};
use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("link regex"));

/// Column width tuning for expanded tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    pub min_column_width: u32,
    pub max_column_width: u32,
    /// Width per display unit of the widest cell.
    pub char_width: u32,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            min_column_width: 60,
            max_column_width: 360,
            char_width: 10,
        }
    }
}

fn is_wide(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fff}' | '\u{3000}'..='\u{303f}' | '\u{ff00}'..='\u{ffef}')
}

/// Display width of cell text. Links count as their label; CJK and fullwidth characters count 2.
pub fn display_width(text: &str) -> u32 {
    let visible = LINK.replace_all(text, "$1");
    visible.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

/// One width per column of `grid`, clamped into the configured range.
pub fn column_widths(grid: &TableGrid, options: &ExpandOptions) -> Vec<u32> {
    let floor = options.min_column_width;
    let ceiling = options.max_column_width.max(floor);
    (0..grid.col_count())
        .map(|col| {
            let widest = (0..grid.row_count())
                .map(|row| display_width(grid.cell(row, col)))
                .max()
                .unwrap_or(0);
            widest.saturating_mul(options.char_width).clamp(floor, ceiling)
        })
        .collect()
}

pub fn table_property(grid: &TableGrid, header_row: bool, options: &ExpandOptions) -> TableProperty {
    TableProperty {
        row_size: grid.row_count(),
        column_size: grid.col_count(),
        header_row,
        header_column: false,
        column_width: column_widths(grid, options),
        merge_info: Vec::new(),
    }
}

/// Append one cell per grid position (row-major) under `table`, each holding a text block.
pub fn attach_cells(doc: &mut Document, table: NodeId, grid: &TableGrid, ids: &mut IdGen) {
    for row in grid.rows() {
        for text in row {
            let cell = doc.push(ids.next_id(), BlockKind::TableCell);
            doc.append_child(table, cell);
            let body = TextBody::new(parse_inline(text)).aligned(1, Some(false));
            let content = doc.push(ids.next_id(), BlockKind::Text(body));
            doc.append_child(cell, content);
        }
    }
}

/// Build a standalone table subtree rooted at the table block.
///
/// Header rows are always flagged; the grid itself is not kept on the table.
pub fn table_descendants(grid: &TableGrid, ids: &mut IdGen, options: &ExpandOptions) -> Document {
    let mut doc = Document::new();
    let table = doc.push(
        ids.next_id(),
        BlockKind::Table(Table {
            property: table_property(grid, true, options),
            grid: None,
        }),
    );
    doc.set_root(table);
    attach_cells(&mut doc, table, grid, ids);
    tracing::debug!(
        rows = grid.row_count(),
        columns = grid.col_count(),
        blocks = doc.len(),
        "expanded table"
    );
    doc
}
