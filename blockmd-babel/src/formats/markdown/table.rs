//! Tables: pipe and HTML tables in, HTML tables out.
//!
//! Both parsers produce a rectangular [`TableGrid`]. Rendering always emits
//! raw HTML, since pipe syntax cannot express merged cells.

use crate::ir::nodes::{MergeSpan, TableGrid};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("row regex"));
static CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(td|th)\b[^>]*>(.*?)</(?:td|th)>").expect("cell regex")
});
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("line break regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&(nbsp|amp|lt|gt|quot|#39);").expect("entity regex"));

/// A table recognized at some line of a Markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedTable {
    pub grid: TableGrid,
    pub header_row: bool,
    /// Index of the first line after the table.
    pub next: usize,
}

/// Recognize a pipe table whose header row is `lines[start]`.
///
/// Needs a `|` in the header and a separator row right below it. Body rows
/// continue while lines contain `|` and are not blank.
pub fn parse_pipe_table(lines: &[&str], start: usize) -> Option<ScannedTable> {
    let header = *lines.get(start)?;
    let separator = *lines.get(start + 1)?;
    if !header.contains('|') || !is_separator(separator) {
        return None;
    }

    let mut rows = vec![split_row(header)];
    let mut next = start + 2;
    while let Some(line) = lines.get(next) {
        if !line.contains('|') || line.trim().is_empty() {
            break;
        }
        rows.push(split_row(line));
        next += 1;
    }

    Some(ScannedTable {
        grid: TableGrid::from_rows(rows),
        header_row: true,
        next,
    })
}

fn split_row(line: &str) -> Vec<String> {
    let row = line.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.contains('-') {
        return false;
    }
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').all(|part| {
        let part = part.trim();
        let part = part.strip_prefix(':').unwrap_or(part);
        let part = part.strip_suffix(':').unwrap_or(part);
        !part.is_empty() && part.chars().all(|c| c == '-')
    })
}

/// Recognize a raw HTML table opening on `lines[start]`.
///
/// Consumes lines up to and including the one holding `</table>` (or the rest
/// of the input). A table without any cells is not a table.
pub fn parse_html_table(lines: &[&str], start: usize) -> Option<ScannedTable> {
    if !lines.get(start)?.contains("<table") {
        return None;
    }

    let mut next = start;
    while next < lines.len() {
        let closes = lines[next].contains("</table>");
        next += 1;
        if closes {
            break;
        }
    }
    let html = lines[start..next].join("\n");

    let mut header_row = false;
    let mut rows = Vec::new();
    for row in ROW.captures_iter(&html) {
        let cells: Vec<String> = CELL
            .captures_iter(&row[1])
            .map(|cell| {
                if cell[1].eq_ignore_ascii_case("th") {
                    header_row = true;
                }
                strip_html(&cell[2])
            })
            .collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    if rows.is_empty() {
        return None;
    }
    Some(ScannedTable {
        grid: TableGrid::from_rows(rows),
        header_row,
        next,
    })
}

/// Cell text of an HTML fragment: line breaks kept, other tags dropped, entities decoded.
fn strip_html(html: &str) -> String {
    let text = LINE_BREAK.replace_all(html, "\n");
    let text = TAG.replace_all(&text, "");
    let text = ENTITY.replace_all(&text, |caps: &regex::Captures<'_>| {
        match caps[1].to_ascii_lowercase().as_str() {
            "nbsp" => " ",
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        }
        .to_string()
    });
    text.trim().to_string()
}

/// Render a table from its flat, row-major cell texts.
///
/// `merges` runs parallel to `cells`. A span hides every other position it
/// covers; the anchor gets `rowspan`/`colspan` only for spans above 1.
pub fn render_html_table(cells: &[String], merges: &[MergeSpan], col_count: usize) -> String {
    if col_count == 0 {
        return String::new();
    }

    let row_count = cells.len().div_ceil(col_count);
    let mut covered: HashSet<(usize, usize)> = HashSet::new();
    let mut html = vec!["<table>".to_string()];

    for (r, row) in cells.chunks(col_count).enumerate() {
        html.push("<tr>".to_string());
        for (c, text) in row.iter().enumerate() {
            if covered.contains(&(r, c)) {
                continue;
            }
            let span = merges.get(r * col_count + c);
            let mut attrs = String::new();
            if let Some(span) = span {
                if span.row_span > 1 {
                    attrs.push_str(&format!(r#" rowspan="{}""#, span.row_span));
                }
                if span.col_span > 1 {
                    attrs.push_str(&format!(r#" colspan="{}""#, span.col_span));
                }
                // Spans never cover positions outside the grid.
                let row_end = r.saturating_add(span.row_span.max(1)).min(row_count);
                let col_end = c.saturating_add(span.col_span.max(1)).min(col_count);
                for rr in r..row_end {
                    for cc in c..col_end {
                        covered.insert((rr, cc));
                    }
                }
            }
            html.push(format!("<td{attrs}>{text}</td>"));
        }
        html.push("</tr>".to_string());
    }

    html.push("</table>".to_string());
    html.join("\n")
}
