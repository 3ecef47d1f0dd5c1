//! Markdown → blocks → Markdown round trips

use blockmd_babel::format::Format;
use blockmd_babel::formats::MarkdownFormat;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use proptest::prelude::*;

fn round_trip(md: &str) -> String {
    let format = MarkdownFormat::default();
    let doc = format.parse(md).expect("markdown always parses");
    format.serialize(&doc).expect("render")
}

/// Heading levels, list item count and code blocks, in document order.
#[derive(Debug, PartialEq)]
struct Outline {
    headings: Vec<u8>,
    items: usize,
    code: Vec<(String, String)>,
}

fn outline(md: &str) -> Outline {
    let arena = Arena::new();
    let root: &AstNode = parse_document(&arena, md, &ComrakOptions::default());
    let mut outline = Outline {
        headings: Vec::new(),
        items: 0,
        code: Vec::new(),
    };
    for node in root.descendants() {
        match &node.data.borrow().value {
            NodeValue::Heading(h) => outline.headings.push(h.level),
            NodeValue::Item(_) => outline.items += 1,
            NodeValue::CodeBlock(c) => outline.code.push((c.info.clone(), c.literal.clone())),
            _ => {}
        }
    }
    outline
}

#[test]
fn test_canonical_document_is_stable() {
    let md = "# Title\n---\nHello **world**\n\n---\n- x\n- y";
    assert_eq!(round_trip(md), "# Title\n---\nHello **world**  \n\n---\n- x\n- y\n");
}

#[test]
fn test_structure_survives() {
    let md = "# Doc\n\n## Part\n\nSome text\n\n- a\n  - b\n- c\n\n1. one\n2. two\n\n```rust\nfn main() {}\n```\n\n#### Deep";
    let rendered = round_trip(md);
    assert_eq!(outline(&rendered), outline(md));
}

#[test]
fn test_second_pass_is_a_fixed_point() {
    let md = "# Notes\n\n- [ ] open\n- [x] closed\n\n> quoted\n> twice\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\n![](boxTok)";
    let once = round_trip(md);
    assert_eq!(round_trip(&once), once);
}

proptest! {
    #[test]
    fn rendered_output_is_normalized(md in r"[a-z0-9#>*_`|\- \n\[\]()!]{0,120}") {
        let rendered = round_trip(&md);
        prop_assert!(rendered.starts_with('#'));
        prop_assert!(rendered.ends_with('\n'));
        prop_assert!(!rendered.ends_with("\n\n"));
        prop_assert!(!rendered.contains("\n\n\n"));
    }
}
