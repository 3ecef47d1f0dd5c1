//! Import tests for Markdown format (Markdown → blocks)

use blockmd_babel::format::Format;
use blockmd_babel::formats::MarkdownFormat;
use blockmd_babel::ir::nodes::{BlockKind, CodeLanguage, Document, NodeId, Run, RunStyle, TextBody};
use blockmd_babel::ScanOptions;

fn tree(md: &str) -> Document {
    MarkdownFormat::default().parse(md).expect("markdown always parses")
}

fn root_children(doc: &Document) -> Vec<NodeId> {
    doc.children(doc.root().expect("root")).to_vec()
}

fn types(doc: &Document, nodes: &[NodeId]) -> Vec<Option<u32>> {
    nodes
        .iter()
        .map(|&n| doc.get(n).kind.block_type())
        .collect()
}

#[test]
fn test_flat_table_scenario() {
    let flat = MarkdownFormat::default().parse_flat("# T\n\n| A | B |\n|---|---|\n| 1 | 2 |");
    assert_eq!(flat.title, "T");

    let tables: Vec<_> = flat
        .blocks
        .iter()
        .filter_map(|b| match b {
            BlockKind::Table(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(tables.len(), 1);
    let grid = tables[0].grid.as_ref().expect("flat tables keep their grid");
    assert_eq!(grid.rows(), &[vec!["A", "B"], vec!["1", "2"]]);
}

#[test]
fn test_flat_table_rows_include_header() {
    let flat = MarkdownFormat::default()
        .parse_flat("# T\n\n| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |");
    let grid = flat
        .blocks
        .iter()
        .find_map(|b| match b {
            BlockKind::Table(t) => t.grid.clone(),
            _ => None,
        })
        .expect("table");
    assert_eq!(grid.row_count(), 3);
}

#[test]
fn test_title_defaults() {
    assert_eq!(tree("Just a paragraph.").title, "Untitled");

    let format = MarkdownFormat::new(ScanOptions {
        default_title: "Inbox".to_string(),
        ..ScanOptions::default()
    });
    assert_eq!(format.parse_flat("- item").title, "Inbox");
}

#[test]
fn test_tree_page_root() {
    let doc = tree("# Plan\n\nParagraph\n\n- bullet\n\n1. ordered");
    let root = doc.root().expect("root");
    let page = doc.get(root);
    assert_eq!(page.id, "local_1");
    assert_eq!(page.kind, BlockKind::Page(TextBody::plain("Plan").aligned(1, None)));
    assert_eq!(
        types(&doc, &root_children(&doc)),
        vec![Some(2), Some(2), Some(2), Some(12), Some(2), Some(13)]
    );
    for (_, block) in doc.iter().skip(1) {
        assert_eq!(block.parent.map(|p| doc.get(p).id.as_str()), Some("local_1"));
    }
}

#[test]
fn test_ids_are_sequential() {
    let doc = tree("# T\n\none\n\n> q1\n> q2");
    let ids: Vec<&str> = doc.iter().map(|(_, b)| b.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["local_1", "local_2", "local_3", "local_4", "local_5", "local_6", "local_7"]
    );
}

#[test]
fn test_headings_parse() {
    let doc = tree("# Doc\n\n## Section\n\n### Sub *x*\n\n######### Nine");
    let headings: Vec<(u8, Vec<Run>)> = doc
        .iter()
        .filter_map(|(_, b)| match &b.kind {
            BlockKind::Heading { level, body } => Some((*level, body.runs.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        headings,
        vec![
            (2, vec![Run::plain("Section")]),
            (3, vec![Run::plain("Sub "), Run::styled("x", RunStyle::Italic)]),
            (9, vec![Run::plain("Nine")]),
        ]
    );
}

#[test]
fn test_todo_items() {
    let flat = MarkdownFormat::default().parse_flat("# T\n\n- [ ] pending\n- [x] done\n- [X] also");
    let todos: Vec<(String, bool)> = flat
        .blocks
        .iter()
        .filter_map(|b| match b {
            BlockKind::Todo { body, done } => match body.runs.as_slice() {
                [Run::Text { content, .. }] => Some((content.clone(), *done)),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(
        todos,
        vec![
            ("pending".to_string(), false),
            ("done".to_string(), true),
            ("also".to_string(), true),
        ]
    );
}

#[test]
fn test_code_fence_language_and_body() {
    let doc = tree("```python\nif x:\n    pass\n```\nafter");
    let children = root_children(&doc);
    assert_eq!(
        doc.get(children[0]).kind,
        BlockKind::Code {
            body: TextBody::plain("if x:\n    pass"),
            language: Some(CodeLanguage::Name("python".to_string())),
            wrap: true,
        }
    );
    assert_eq!(types(&doc, &children), vec![Some(14), Some(2)]);
}

#[test]
fn test_html_table_import() {
    let md = "<table>\n<tr><th>Key</th><th>Value</th></tr>\n<tr><td>a</td><td>1<br>2</td></tr>\n</table>";
    let doc = tree(md);
    let table = root_children(&doc)[0];
    let BlockKind::Table(t) = &doc.get(table).kind else {
        panic!("expected a table");
    };
    assert!(t.property.header_row);
    assert_eq!((t.property.row_size, t.property.column_size), (2, 2));

    let cells = doc.children(table);
    let last_text = doc.children(cells[3])[0];
    assert_eq!(
        doc.get(last_text).kind.body().map(|b| b.runs.clone()),
        Some(vec![Run::plain("1\n2")])
    );
}

#[test]
fn test_image_line() {
    let doc = tree("![diagram](boxcnXYZ)\n![alt](a) trailing");
    let children = root_children(&doc);
    assert_eq!(
        doc.get(children[0]).kind,
        BlockKind::Image {
            token: "boxcnXYZ".to_string()
        }
    );
    assert_eq!(doc.get(children[1]).kind.block_type(), Some(2));
}

#[test]
fn test_list_nesting_and_reset() {
    let doc = tree("- a\n  - b\n    - c\n  - d\n- e\n\nbreak\n  - f");
    let top = root_children(&doc);
    // a, e, blank, "break", f
    assert_eq!(top.len(), 5);
    let a = doc.children(top[0]);
    assert_eq!(a.len(), 2);
    assert_eq!(doc.children(a[0]).len(), 1);
    assert_eq!(doc.get(top[4]).kind, BlockKind::Bullet(TextBody::plain("f").aligned(1, Some(false))));
}
