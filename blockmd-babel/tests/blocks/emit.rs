//! Writing platform block JSON

use blockmd_babel::formats::blocks::expand::table_descendants;
use blockmd_babel::ir::ids::IdGen;
use blockmd_babel::ir::nodes::TableGrid;
use blockmd_babel::{markdown_to_flat, BlocksFormat, ExpandOptions, FormatRegistry, ScanOptions};
use serde_json::Value;

const SAMPLE: &str = "# Plan\n\n- [x] ship\n\n```rust\nfn x() {}\n```\n\n| A | B |\n|---|---|\n| 1 | 2 |";

fn markdown_to_blocks(md: &str) -> Value {
    let json = FormatRegistry::default()
        .convert(md, "markdown", "blocks")
        .expect("convert");
    serde_json::from_str(&json).expect("valid JSON")
}

fn find_by_type(blocks: &[Value], block_type: u64) -> &Value {
    blocks
        .iter()
        .find(|b| b["block_type"] == block_type)
        .expect("block of type")
}

#[test]
fn test_tree_metadata_and_root() {
    let json = markdown_to_blocks(SAMPLE);
    assert_eq!(json["metadata"]["document_id"], "local_1");
    assert_eq!(json["metadata"]["title"], "Plan");
    assert_eq!(json["metadata"]["revision_id"], 1);

    let blocks = json["blocks"].as_array().expect("blocks");
    let page = &blocks[0];
    assert_eq!(page["block_type"], 1);
    assert_eq!(page["parent_id"], "");
    assert_eq!(page["page"]["elements"][0]["text_run"]["content"], "Plan");

    let children = page["children"].as_array().expect("children");
    for child in children {
        let block = blocks
            .iter()
            .find(|b| &b["block_id"] == child)
            .expect("child emitted");
        assert_eq!(block["parent_id"], "local_1");
    }
}

#[test]
fn test_tree_payloads() {
    let json = markdown_to_blocks(SAMPLE);
    let blocks = json["blocks"].as_array().expect("blocks");

    let todo = find_by_type(blocks, 17);
    assert_eq!(todo["todo"]["style"]["done"], true);

    let code = find_by_type(blocks, 14);
    assert_eq!(code["code"]["style"]["language"], 53);
    assert_eq!(code["code"]["style"]["wrap"], true);
    assert_eq!(code["code"]["elements"][0]["text_run"]["content"], "fn x() {}");

    let table = find_by_type(blocks, 31);
    assert_eq!(table["table"]["cells"], table["children"]);
    assert_eq!(table["table"]["cells"].as_array().map(Vec::len), Some(4));
    let property = &table["table"]["property"];
    assert_eq!(property["row_size"], 2);
    assert_eq!(property["column_size"], 2);
    assert_eq!(property["header_row"], true);
    assert_eq!(property["column_width"].as_array().map(Vec::len), Some(2));
    assert!(table.get("_table").is_none());

    let cell_ids = table["children"].as_array().expect("cells");
    let first_cell = blocks
        .iter()
        .find(|b| b["block_id"] == cell_ids[0])
        .expect("cell");
    assert_eq!(first_cell["block_type"], 32);
    assert_eq!(first_cell["children"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_empty_text_keeps_one_element() {
    let json = markdown_to_blocks("# T\n\n");
    let blocks = json["blocks"].as_array().expect("blocks");
    let blank = find_by_type(blocks, 2);
    assert_eq!(blank["text"]["elements"][0]["text_run"]["content"], "");
}

#[test]
fn test_flat_blocks_carry_raw_grid() {
    let md = "# T\n\n| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n\ntext";
    let flat = markdown_to_flat(md, &ScanOptions::default());
    let json = BlocksFormat::default()
        .serialize_flat(&flat)
        .expect("serialize");
    let json: Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(json["title"], "T");
    let blocks = json["blocks"].as_array().expect("blocks");
    assert!(blocks.iter().all(|b| b.get("block_id").is_none()));
    let table = find_by_type(blocks, 31);
    assert_eq!(table["_table"]["rows"].as_array().map(Vec::len), Some(3));
    assert_eq!(table["_table"]["rows"][2][1], "4");
}

#[test]
fn test_table_descendants_shape() {
    let grid = TableGrid::from_rows(vec![
        vec!["Name".to_string(), "Role".to_string()],
        vec!["Ada".to_string(), "[docs](https://d.example)".to_string()],
    ]);
    let doc = table_descendants(&grid, &mut IdGen::new(), &ExpandOptions::default());
    let json = BlocksFormat::compact()
        .serialize_descendants(&doc)
        .expect("serialize");
    let json: Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(json["children_id"], serde_json::json!(["local_1"]));
    let descendants = json["descendants"].as_array().expect("descendants");
    // table + 4 cells + 4 texts
    assert_eq!(descendants.len(), 9);
    assert!(descendants[0].get("parent_id").is_none());
    assert_eq!(descendants[1]["parent_id"], "local_1");
    assert_eq!(descendants[0]["table"]["property"]["header_row"], true);

    let link = descendants
        .iter()
        .flat_map(|b| b["text"]["elements"].as_array().cloned().unwrap_or_default())
        .find_map(|e| e["text_run"]["text_element_style"]["link"]["url"].as_str().map(String::from))
        .expect("link run");
    assert_eq!(link, "https%3A%2F%2Fd.example");
}

#[test]
fn test_markdown_survives_blocks_round_trip() {
    let md = "# Notes\n\n## Tasks\n\n- [ ] write\n- [x] review\n\n1. first\n2. second\n   - nested\n\n> careful\n> now\n\n```python\nprint(1)\n```\n\n| K | V |\n|---|---|\n| a | [site](https://example.com/p?q=1) |\n\nSee **bold** and _it_ and `code`.";
    let registry = FormatRegistry::default();

    let direct = registry.convert(md, "markdown", "markdown").expect("md");
    let json = registry.convert(md, "markdown", "blocks").expect("blocks");
    let via_blocks = registry.convert(&json, "blocks", "markdown").expect("md");
    assert_eq!(via_blocks, direct);
}
