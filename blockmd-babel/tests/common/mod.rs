//! Builders for platform block JSON used across the integration tests.

use serde_json::{json, Value};

pub fn run(content: &str) -> Value {
    json!({ "text_run": { "content": content, "text_element_style": {} } })
}

pub fn styled_run(content: &str, style: Value) -> Value {
    json!({ "text_run": { "content": content, "text_element_style": style } })
}

pub fn payload(elements: Vec<Value>) -> Value {
    json!({ "style": {}, "elements": elements })
}

/// A block whose type-specific payload lives under `key`.
pub fn block(id: &str, block_type: u32, key: &str, body: Value) -> Value {
    let mut block = json!({ "block_id": id, "block_type": block_type });
    block[key] = body;
    block
}

pub fn text(id: &str, content: &str) -> Value {
    block(id, 2, "text", payload(vec![run(content)]))
}

pub fn heading(id: &str, level: u32, content: &str) -> Value {
    block(
        id,
        2 + level,
        &format!("heading{level}"),
        payload(vec![run(content)]),
    )
}

pub fn bullet(id: &str, content: &str) -> Value {
    block(id, 12, "bullet", payload(vec![run(content)]))
}

pub fn ordered(id: &str, content: &str) -> Value {
    block(id, 13, "ordered", payload(vec![run(content)]))
}

pub fn with_children(mut block: Value, children: &[&str]) -> Value {
    block["children"] = json!(children);
    block
}

/// A document rooted at page `doc1` titled `title`, whose direct children are `top`.
///
/// `blocks` holds every non-root block, nested ones included.
pub fn document(title: &str, top: &[&str], blocks: Vec<Value>) -> String {
    let page = with_children(block("doc1", 1, "page", payload(vec![run(title)])), top);
    let mut all = vec![page];
    all.extend(blocks);
    json!({ "metadata": { "document_id": "doc1" }, "blocks": all }).to_string()
}

/// A document whose root children are exactly `blocks`, in order.
pub fn flat_document(title: &str, blocks: Vec<Value>) -> String {
    let ids: Vec<String> = blocks
        .iter()
        .map(|b| b["block_id"].as_str().unwrap_or_default().to_string())
        .collect();
    let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
    document(title, &ids, blocks)
}

pub fn render(json: &str) -> String {
    blockmd_babel::blocks_to_markdown(json).expect("valid JSON")
}
