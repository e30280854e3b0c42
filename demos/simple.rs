//! Building a VDF tree, writing it out and reading it back.
//!
//! Run with: cargo run --example simple

use serde_vdf::{parse_str, to_string, Table, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut limits = Table::new();
    limits.add(Value::double("cpu", 0.5))?;
    limits.add(Value::integer("memory_mb", 512))?;

    let mut config = Table::new();
    config.add(Value::integer("retries", 3).with_comment("how often to retry"))?;
    config.add(Value::string("name", "hi\"there"))?;
    config.add(Value::token("material", "base_texture"))?;
    config.add(Value::table("limits", limits))?;

    let root = Value::table("config", config);

    // Serialize to VDF
    let text = to_string(&root);
    println!("VDF output:\n{}", text);

    // Parse it back
    let parsed = parse_str(&text)?;
    assert_eq!(parsed, root);
    println!("✓ Round-trip successful");

    // Names are unique within a table
    let table = root.as_table().ok_or("root is not a table")?;
    let mut copy = table.clone();
    if let Err(err) = copy.add(Value::integer("retries", 5)) {
        println!("✓ Rejected duplicate: {}", err);
    }

    Ok(())
}
