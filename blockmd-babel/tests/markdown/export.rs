//! Export tests for Markdown format (blocks → Markdown)
//!
//! Most tests re-parse the rendered Markdown with comrak and check the
//! resulting structure rather than comparing bytes.

use crate::common::*;
use blockmd_babel::format::Format;
use blockmd_babel::formats::MarkdownFormat;
use blockmd_babel::ir::nodes::{BlockKind, Document, Run, RunStyle, TextBody};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use serde_json::json;

fn comrak_ast<'a>(md: &str, arena: &'a Arena<AstNode<'a>>) -> &'a AstNode<'a> {
    let options = ComrakOptions::default();
    parse_document(arena, md, &options)
}

fn text_of<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if let NodeValue::Text(text) = &descendant.data.borrow().value {
            out.push_str(text);
        }
    }
    out
}

#[test]
fn test_end_to_end_render() {
    let mut doc = Document::new();
    let root = doc.push("doc", BlockKind::Page(TextBody::plain("Title")));
    doc.set_root(root);
    let children = [
        BlockKind::Text(TextBody::new(vec![
            Run::plain("Hello "),
            Run::styled("world", RunStyle::Bold),
        ])),
        BlockKind::Text(TextBody::plain("")),
        BlockKind::Divider,
        BlockKind::Bullet(TextBody::plain("x")),
        BlockKind::Bullet(TextBody::plain("y")),
    ];
    for (n, kind) in children.into_iter().enumerate() {
        let node = doc.push(format!("b{n}"), kind);
        doc.append_child(root, node);
    }

    let md = MarkdownFormat::default().serialize(&doc).expect("render");
    assert_eq!(md, "# Title\n---\nHello **world**  \n\n---\n- x\n- y\n");
}

#[test]
fn test_empty_input_renders_empty() {
    assert_eq!(render(r#"{"blocks": []}"#), "");
    assert_eq!(render("{}"), "");
}

#[test]
fn test_headings_levels() {
    let md = render(&flat_document(
        "Doc",
        vec![
            heading("h1", 1, "One"),
            text("t", "body"),
            heading("h2", 2, "Two"),
            heading("h3", 3, "Three"),
        ],
    ));

    let arena = Arena::new();
    let root = comrak_ast(&md, &arena);
    let levels: Vec<(u8, String)> = root
        .children()
        .filter_map(|child| match &child.data.borrow().value {
            NodeValue::Heading(h) => Some((h.level, text_of(child))),
            _ => None,
        })
        .collect();
    assert_eq!(
        levels,
        vec![
            (1, "Doc".to_string()),
            (1, "One".to_string()),
            (2, "Two".to_string()),
            (3, "Three".to_string()),
        ]
    );
}

#[test]
fn test_nested_lists() {
    let json = document(
        "Doc",
        &["a", "b"],
        vec![
            with_children(bullet("a", "first"), &["a1", "a2"]),
            bullet("b", "second"),
            ordered("a1", "inner one"),
            ordered("a2", "inner two"),
        ],
    );
    let md = render(&json);
    assert!(md.contains("- first\n  1. inner one\n  2. inner two\n- second\n"));

    let arena = Arena::new();
    let root = comrak_ast(&md, &arena);
    let list = root
        .children()
        .find(|n| matches!(n.data.borrow().value, NodeValue::List(_)))
        .expect("list");
    match &list.data.borrow().value {
        NodeValue::List(l) => assert_eq!(l.list_type, ListType::Bullet),
        _ => unreachable!(),
    }
    let first_item = list.first_child().expect("item");
    let nested = first_item
        .children()
        .find(|n| matches!(n.data.borrow().value, NodeValue::List(_)))
        .expect("nested list");
    match &nested.data.borrow().value {
        NodeValue::List(l) => assert_eq!(l.list_type, ListType::Ordered),
        _ => unreachable!(),
    }
    assert_eq!(nested.children().count(), 2);
}

#[test]
fn test_ordered_numbering_ignores_interleaved_bullets() {
    let md = render(&flat_document(
        "Doc",
        vec![
            ordered("o1", "one"),
            bullet("b", "aside"),
            ordered("o2", "two"),
            ordered("o3", "three"),
        ],
    ));
    assert!(md.ends_with("1. one\n- aside\n2. two\n3. three\n"));
}

#[test]
fn test_code_block_language() {
    let code = json!({
        "block_id": "c",
        "block_type": 14,
        "code": {
            "style": { "language": 49, "wrap": true },
            "elements": [{ "text_run": { "content": "print('hi')\n", "text_element_style": {} } }]
        }
    });
    let md = render(&flat_document("Doc", vec![code]));

    let arena = Arena::new();
    let root = comrak_ast(&md, &arena);
    let block = root
        .children()
        .find_map(|n| match &n.data.borrow().value {
            NodeValue::CodeBlock(c) => Some((c.info.clone(), c.literal.clone())),
            _ => None,
        })
        .expect("code block");
    assert_eq!(block, ("python".to_string(), "print('hi')\n".to_string()));
}

#[test]
fn test_inline_styles() {
    let elements = vec![
        styled_run("b", json!({ "bold": true })),
        run(" "),
        styled_run("i", json!({ "italic": true })),
        run(" "),
        styled_run("c", json!({ "inline_code": true })),
        run(" "),
        styled_run("both", json!({ "bold": true, "italic": true })),
    ];
    let md = render(&flat_document(
        "Doc",
        vec![block("t", 2, "text", payload(elements))],
    ));
    assert!(md.contains("**b** _i_ `c` **both**  \n"));

    let arena = Arena::new();
    let root = comrak_ast(&md, &arena);
    let mut kinds = Vec::new();
    for node in root.descendants() {
        match &node.data.borrow().value {
            NodeValue::Strong => kinds.push("strong"),
            NodeValue::Emph => kinds.push("emph"),
            NodeValue::Code(_) => kinds.push("code"),
            _ => {}
        }
    }
    assert_eq!(kinds, vec!["strong", "emph", "code", "strong"]);
}

#[test]
fn test_link_url_is_decoded() {
    let link = styled_run(
        "click here",
        json!({ "link": { "url": "https%3A%2F%2Fexample.com" } }),
    );
    let md = render(&flat_document(
        "Doc",
        vec![block("t", 2, "text", payload(vec![link]))],
    ));
    assert!(md.contains("[click here](https://example.com)"));
}

#[test]
fn test_bad_url_encoding_is_kept_raw() {
    let link = styled_run("x", json!({ "link": { "url": "https://e.com/%E0%A4%A" } }));
    let md = render(&flat_document(
        "Doc",
        vec![block("t", 2, "text", payload(vec![link]))],
    ));
    assert!(md.contains("[x](https://e.com/%E0%A4%A)"));
}

#[test]
fn test_mentions_and_equations() {
    let elements = vec![
        json!({ "mention_user": { "user_id": "ou_42" } }),
        run(" see "),
        json!({ "mention_doc": { "title": "Plan", "url": "https%3A%2F%2Fd.example%2Fp" } }),
        run(" "),
        json!({ "equation": { "content": "a+b\n" } }),
        json!({ "reminder": { "time": 1 } }),
    ];
    let alone = vec![json!({ "equation": { "content": "E=mc^2\n" } })];
    let md = render(&flat_document(
        "Doc",
        vec![
            block("t", 2, "text", payload(elements)),
            block("e", 2, "text", payload(alone)),
        ],
    ));
    assert!(md.contains("ou_42 see [Plan](https://d.example/p) $a+b$  \n"));
    assert!(md.contains("$$E=mc^2$$  \n"));
}

#[test]
fn test_todo_divider_image_quote() {
    let todo_done = block(
        "t1",
        17,
        "todo",
        json!({ "style": { "done": true }, "elements": [run("ship")] }),
    );
    let todo_open = block("t2", 17, "todo", payload(vec![run("test")]));
    let divider = json!({ "block_id": "d", "block_type": 22, "divider": {} });
    let image = json!({ "block_id": "i", "block_type": 27, "image": { "token": "boxAbC" } });
    let quote = block("q", 15, "quote", payload(vec![run("wise words")]));

    let md = render(&flat_document(
        "Doc",
        vec![todo_done, todo_open, divider, image, quote],
    ));
    assert!(md.ends_with("- [x] ship\n- [ ] test\n---\n![](boxAbC)\n> wise words\n"));
}

#[test]
fn test_quote_container_children_are_prefixed() {
    let json = document(
        "Doc",
        &["qc"],
        vec![
            with_children(
                json!({ "block_id": "qc", "block_type": 34, "quote_container": {} }),
                &["q1", "q2", "q3"],
            ),
            text("q1", "first"),
            text("q2", ""),
            bullet("q3", "point"),
        ],
    );
    let md = render(&json);

    let arena = Arena::new();
    let root = comrak_ast(&md, &arena);
    let quote = root
        .children()
        .find(|n| matches!(n.data.borrow().value, NodeValue::BlockQuote))
        .expect("block quote");
    let inner: Vec<&str> = quote
        .children()
        .map(|n| match n.data.borrow().value {
            NodeValue::Paragraph => "paragraph",
            NodeValue::List(_) => "list",
            _ => "other",
        })
        .collect();
    assert_eq!(inner, vec!["paragraph", "list"]);
}

#[test]
fn test_unknown_blocks_render_children() {
    let json = document(
        "Doc",
        &["u"],
        vec![
            with_children(json!({ "block_id": "u", "block_type": 48, "callout": {} }), &["in"]),
            text("in", "inside a callout"),
        ],
    );
    assert_eq!(render(&json), "# Doc\n---\ninside a callout  \n");
}

#[test]
fn test_consecutive_blank_lines_collapse() {
    let md = render(&flat_document(
        "Doc",
        vec![
            text("a", "one"),
            text("b1", ""),
            text("b2", " "),
            text("b3", ""),
            text("c", "two"),
        ],
    ));
    assert_eq!(md, "# Doc\n---\none  \n\ntwo  \n");
    assert!(!md.contains("\n\n\n"));
}
