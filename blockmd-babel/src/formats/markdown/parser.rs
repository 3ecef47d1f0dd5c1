//! Markdown scanning (Markdown → blocks)
//!
//! A single line-oriented pass classifies the input into [`Unit`]s. Two
//! builders consume them:
//!
//! - [`parse_flat`]: an ordered list of unlinked blocks, tables kept as
//!   grid descriptors, for appending into an existing container.
//! - [`parse_tree`]: a rooted [`Document`] with `local_N` ids, nested lists
//!   and quote containers, tables expanded into cells.
//!
//! Line classification, in priority order: HTML table, pipe table, code fence,
//! quote run, horizontal rule, heading, image, list item, blank line,
//! paragraph text.

use super::inline::parse_inline;
use super::table::{parse_html_table, parse_pipe_table, ScannedTable};
use crate::formats::blocks::expand::{attach_cells, table_property, ExpandOptions};
use crate::ir::ids::IdGen;
use crate::ir::nodes::{
    BlockKind, CodeLanguage, Document, FlatDocument, NodeId, Run, Table, TableProperty, TextBody,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,9})\s+(.*)$").expect("heading regex"));
static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[[^\]]*\]\(([^)]+)\)$").expect("image regex"));
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*+]\s+|\d+\.\s+)(.*)$").expect("list item regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Title used when the first content line is not a `# ` heading, or is an empty one.
    pub default_title: String,
    pub table: ExpandOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            default_title: "Untitled".to_string(),
            table: ExpandOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
    Todo { done: bool },
}

#[derive(Debug, Clone, PartialEq)]
enum Unit<'a> {
    Table(ScannedTable),
    Code { language: &'a str, body: String },
    Quote(Vec<&'a str>),
    Divider,
    Heading { level: u8, text: &'a str },
    Image(&'a str),
    ListItem { indent: usize, kind: ListKind, text: &'a str },
    Blank,
    Paragraph(String),
}

struct Scan<'a> {
    title: String,
    units: Vec<Unit<'a>>,
}

fn has_hard_break(line: &str) -> bool {
    let mut tail = line.chars().rev();
    matches!(
        (tail.next(), tail.next()),
        (Some(' ' | '\t'), Some(' ' | '\t'))
    )
}

fn is_rule(trimmed: &str) -> bool {
    matches!(trimmed, "---" | "***" | "___")
}

/// Quote marker and one following whitespace character removed.
fn strip_quote(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('>').unwrap_or(rest);
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => rest,
    }
}

/// `[ ] rest`, `[x] rest` or `[X] rest`. A bracket glued to text is not a checkbox.
fn checkbox(text: &str) -> Option<(bool, &str)> {
    let (done, rest) = if let Some(rest) = text.strip_prefix("[ ]") {
        (false, rest)
    } else if let Some(rest) = text.strip_prefix("[x]").or_else(|| text.strip_prefix("[X]")) {
        (true, rest)
    } else {
        return None;
    };
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then(|| (done, rest.trim_start()))
}

fn list_item(line: &str) -> Option<Unit<'_>> {
    let caps = LIST_ITEM.captures(line)?;
    let indent = caps.get(1).map_or(0, |m| m.as_str().len()) / 2;
    let marker = caps.get(2).map_or("", |m| m.as_str());
    let text = caps.get(3).map_or("", |m| m.as_str()).trim();

    let (kind, text) = if marker.starts_with(|c: char| c.is_ascii_digit()) {
        (ListKind::Ordered, text)
    } else if let Some((done, rest)) = checkbox(text) {
        (ListKind::Todo { done }, rest)
    } else {
        (ListKind::Bullet, text)
    };
    Some(Unit::ListItem { indent, kind, text })
}

fn scan<'a>(lines: &[&'a str], options: &ScanOptions) -> Scan<'a> {
    let mut i = 0;
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }

    let mut title = options.default_title.clone();
    if let Some(rest) = lines.get(i).and_then(|line| line.strip_prefix("# ")) {
        let rest = rest.trim();
        if !rest.is_empty() {
            title = rest.to_string();
        }
        i += 1;
        if lines.get(i).is_some_and(|line| line.trim() == "---") {
            i += 1;
        }
    }

    let mut units = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    fn flush<'a>(paragraph: &mut Vec<&'a str>, units: &mut Vec<Unit<'a>>) {
        if !paragraph.is_empty() {
            units.push(Unit::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
    }

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if let Some(table) = parse_html_table(lines, i).or_else(|| parse_pipe_table(lines, i)) {
            flush(&mut paragraph, &mut units);
            i = table.next;
            units.push(Unit::Table(table));
            continue;
        }

        if let Some(language) = trimmed.strip_prefix("```") {
            flush(&mut paragraph, &mut units);
            let mut body = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim().starts_with("```") {
                body.push(lines[i]);
                i += 1;
            }
            i += 1;
            units.push(Unit::Code {
                language: language.trim(),
                body: body.join("\n"),
            });
            continue;
        }

        if trimmed.starts_with('>') {
            flush(&mut paragraph, &mut units);
            let mut quoted = Vec::new();
            while i < lines.len() && lines[i].trim().starts_with('>') {
                quoted.push(strip_quote(lines[i]));
                i += 1;
            }
            units.push(Unit::Quote(quoted));
            continue;
        }

        i += 1;

        if is_rule(trimmed) {
            flush(&mut paragraph, &mut units);
            units.push(Unit::Divider);
        } else if let Some(caps) = HEADING.captures(trimmed) {
            flush(&mut paragraph, &mut units);
            let level = caps.get(1).map_or(1, |m| m.as_str().len());
            units.push(Unit::Heading {
                level: u8::try_from(level).unwrap_or(9),
                text: caps.get(2).map_or("", |m| m.as_str()).trim(),
            });
        } else if let Some(token) = IMAGE.captures(trimmed).and_then(|caps| caps.get(1)) {
            flush(&mut paragraph, &mut units);
            units.push(Unit::Image(token.as_str()));
        } else if let Some(item) = list_item(line) {
            flush(&mut paragraph, &mut units);
            units.push(item);
        } else if trimmed.is_empty() {
            flush(&mut paragraph, &mut units);
            units.push(Unit::Blank);
        } else {
            paragraph.push(trimmed);
            if has_hard_break(line) {
                flush(&mut paragraph, &mut units);
            }
        }
    }
    flush(&mut paragraph, &mut units);

    tracing::debug!(title = %title, units = units.len(), "scanned markdown");
    Scan { title, units }
}

fn normalize_newlines(markdown: &str) -> Cow<'_, str> {
    if markdown.contains('\r') {
        Cow::Owned(markdown.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(markdown)
    }
}

fn code_block(language: &str, body: &str) -> BlockKind {
    BlockKind::Code {
        body: TextBody::plain(body),
        language: (!language.is_empty()).then(|| CodeLanguage::Name(language.to_string())),
        wrap: true,
    }
}

/// Inline runs of each quoted line, separated by newline runs.
fn quote_runs(lines: &[&str]) -> Vec<Run> {
    let mut runs = Vec::new();
    for (n, line) in lines.iter().enumerate() {
        if n > 0 {
            runs.push(Run::plain("\n"));
        }
        runs.extend(parse_inline(line));
    }
    if runs.is_empty() {
        runs.push(Run::plain(""));
    }
    runs
}

fn list_block(kind: ListKind, body: TextBody) -> BlockKind {
    match kind {
        ListKind::Bullet => BlockKind::Bullet(body),
        ListKind::Ordered => BlockKind::Ordered(body),
        ListKind::Todo { done } => BlockKind::Todo { body, done },
    }
}

/// Scan Markdown into unlinked blocks. Never fails.
///
/// Lists stay flat (indentation is dropped) and tables carry their grid so a
/// caller can expand them later.
pub fn parse_flat(markdown: &str, options: &ScanOptions) -> FlatDocument {
    let source = normalize_newlines(markdown);
    let lines: Vec<&str> = source.split('\n').collect();
    let Scan { title, units } = scan(&lines, options);

    let blocks = units
        .into_iter()
        .map(|unit| match unit {
            Unit::Table(ScannedTable {
                grid, header_row, ..
            }) => BlockKind::Table(Table {
                property: TableProperty {
                    row_size: grid.row_count(),
                    column_size: grid.col_count(),
                    header_row,
                    ..Default::default()
                },
                grid: Some(grid),
            }),
            Unit::Code { language, body } => code_block(language, &body),
            Unit::Quote(lines) => BlockKind::Quote(TextBody::new(quote_runs(&lines))),
            Unit::Divider => BlockKind::Divider,
            Unit::Heading { level, text } => {
                BlockKind::heading(level, TextBody::new(parse_inline(text)))
            }
            Unit::Image(token) => BlockKind::Image {
                token: token.to_string(),
            },
            Unit::ListItem { kind, text, .. } => {
                list_block(kind, TextBody::new(parse_inline(text)))
            }
            Unit::Blank => BlockKind::Text(TextBody::plain("")),
            Unit::Paragraph(text) => BlockKind::Text(TextBody::new(parse_inline(&text))),
        })
        .collect();

    FlatDocument { title, blocks }
}

struct TreeBuilder<'o> {
    doc: Document,
    root: NodeId,
    ids: IdGen,
    lists: Vec<NodeId>,
    options: &'o ScanOptions,
}

impl TreeBuilder<'_> {
    fn styled(runs: Vec<Run>) -> TextBody {
        TextBody::new(runs).aligned(1, Some(false))
    }

    fn add(&mut self, parent: NodeId, kind: BlockKind) -> NodeId {
        let node = self.doc.push(self.ids.next_id(), kind);
        self.doc.append_child(parent, node);
        node
    }

    fn add_to_root(&mut self, kind: BlockKind) -> NodeId {
        self.lists.clear();
        self.add(self.root, kind)
    }

    fn unit(&mut self, unit: Unit<'_>) {
        match unit {
            Unit::Table(ScannedTable {
                grid, header_row, ..
            }) => {
                let property = table_property(&grid, header_row, &self.options.table);
                let table = self.add_to_root(BlockKind::Table(Table {
                    property,
                    grid: None,
                }));
                attach_cells(&mut self.doc, table, &grid, &mut self.ids);
            }
            Unit::Code { language, body } => {
                self.add_to_root(code_block(language, &body));
            }
            Unit::Quote(lines) => {
                let quote = self.add_to_root(BlockKind::QuoteContainer);
                for line in lines {
                    let body = Self::styled(parse_inline(line));
                    self.add(quote, BlockKind::Text(body));
                }
            }
            Unit::Divider => {
                self.add_to_root(BlockKind::Divider);
            }
            Unit::Heading { level, text } => {
                let body = Self::styled(parse_inline(text));
                self.add_to_root(BlockKind::heading(level, body));
            }
            Unit::Image(token) => {
                self.add_to_root(BlockKind::Image {
                    token: token.to_string(),
                });
            }
            Unit::ListItem { indent, kind, text } => {
                let level = indent.min(self.lists.len());
                self.lists.truncate(level);
                let parent = self.lists.last().copied().unwrap_or(self.root);
                let body = Self::styled(parse_inline(text));
                let item = self.add(parent, list_block(kind, body));
                self.lists.push(item);
            }
            Unit::Blank => {
                self.add(self.root, BlockKind::Text(Self::styled(vec![Run::plain("")])));
            }
            Unit::Paragraph(text) => {
                let body = Self::styled(parse_inline(&text));
                self.add_to_root(BlockKind::Text(body));
            }
        }
    }
}

/// Scan Markdown into a rooted document. Never fails.
///
/// The root is a page block titled from the first `# ` line and gets id
/// `local_1`; every other block gets the next `local_N` id in creation order.
pub fn parse_tree(markdown: &str, options: &ScanOptions) -> Document {
    let source = normalize_newlines(markdown);
    let lines: Vec<&str> = source.split('\n').collect();
    let Scan { title, units } = scan(&lines, options);

    let mut ids = IdGen::new();
    let mut doc = Document::new();
    let page = TextBody::new(parse_inline(&title)).aligned(1, None);
    let root = doc.push(ids.next_id(), BlockKind::Page(page));
    doc.set_root(root);
    doc.title = title;
    doc.revision_id = 1;

    let mut builder = TreeBuilder {
        doc,
        root,
        ids,
        lists: Vec::new(),
        options,
    };
    for unit in units {
        builder.unit(unit);
    }
    builder.doc
}
