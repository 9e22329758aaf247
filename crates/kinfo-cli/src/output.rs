//! Output helpers shared by commands.

use anyhow::{Context, Result};
use kinfo_store::{KernelData, Value};
use serde_json::Value as JsonValue;

/// Render a CBOR value as JSON. Byte strings become arrays of numbers.
pub fn to_json(value: &Value) -> Result<JsonValue> {
    serde_json::to_value(value).context("value cannot be represented as JSON")
}

pub fn data_to_json(data: &KernelData) -> Result<JsonValue> {
    serde_json::to_value(data).context("kernel data cannot be represented as JSON")
}

pub fn print_json(value: &JsonValue) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
