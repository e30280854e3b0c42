//! Working with the value tree at runtime and converting structs with serde.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_vdf::{from_value, to_string, to_value, vdf, Kind, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with vdf! macro
    let mut config = vdf!("config", {
        "host": "localhost",
        "port": 8080,
        "features": { "auth": 1, "logging": 1, "metrics": 0 }
    })?;

    println!("Config as VDF:\n{}", to_string(&config));

    // Access values dynamically
    let table = config.as_table_mut().ok_or("config is not a table")?;
    if let Some(host) = table.find("host").and_then(Value::as_str) {
        println!("Accessing field 'host': {}", host);
    }
    if let Some(port) = table.find("port").and_then(Value::as_i64) {
        println!("Accessing field 'port': {}", port);
    }
    if let Some(features) = table.find("features").and_then(Value::as_table) {
        println!("Accessing field 'features': {} items", features.len());
    }

    // Mutate in place, keeping order
    *table.get_mut("port")?.kind_mut() = Kind::Integer(8443);
    table.insert(0, Value::string("scheme", "https").with_comment("added at runtime"))?;
    let metrics = table
        .get_mut("features")?
        .into_table_mut()
        .ok_or("features is not a table")?
        .remove("metrics")?;
    println!("Removed '{}' from features\n", metrics.name());
    println!("Updated config:\n{}", config);

    // Convert existing struct to a value tree
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value("user", &user)?;
    println!("User as VDF:\n{}", user_value);

    // Runtime type checks
    println!("Type checks:");
    println!("  is_table:   {}", user_value.is_table());
    println!("  is_string:  {}", user_value.is_string());
    println!("  is_integer: {}", user_value.is_integer());

    let back: User = from_value(&user_value)?;
    println!("\nBack to struct: {:?}", back);

    Ok(())
}
