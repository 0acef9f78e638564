//! Load inputs, apply a map definition, and summarize compiled maps.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use fieldmap_core::{
    Map, MapDefinition, Mapper, Mapping, MappingContext, Record, ReferenceKind, Value,
};
use tracing::{debug, info};

/// One row of the `inspect` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub destination: String,
    pub kind: ReferenceKind,
    pub rule: &'static str,
    pub description: String,
    /// Nesting depth; embedded maps are listed below their mapping.
    pub depth: usize,
}

/// Read a JSON file that must hold an object.
pub fn read_record(path: &Path) -> Result<Record> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    let record = into_record(value).with_context(|| format!("load {}", path.display()))?;
    info!(path = %path.display(), fields = record.len(), "loaded record");
    Ok(record)
}

/// Accept only JSON objects as records.
pub fn into_record(value: Value) -> Result<Record> {
    match value {
        Value::Object(record) => Ok(record),
        other => bail!("expected a JSON object, found {}", json_type(&other)),
    }
}

/// Compile `definition` and map `source` into a copy of `destination`.
pub fn apply_definition(
    definition: MapDefinition,
    source: &Record,
    destination: &Record,
) -> Result<Record> {
    let context: MappingContext = definition
        .into_context()
        .context("compile map definition")?;
    let mapped = Mapper::new()
        .map_record(destination, source, &context)
        .context("apply map")?;
    debug!(fields = mapped.len(), "mapped record");
    Ok(mapped)
}

/// Render a record as JSON text.
pub fn render_record(record: &Record, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(record)
    } else {
        serde_json::to_string_pretty(record)
    };
    rendered.context("serialize mapped record")
}

/// Flatten a map (and its embedded maps) into table rows.
pub fn describe_map(map: &Map) -> Vec<MappingRow> {
    let mut rows = Vec::new();
    collect_rows(map, 0, &mut rows);
    rows
}

fn collect_rows(map: &Map, depth: usize, rows: &mut Vec<MappingRow>) {
    for mapping in map {
        let destination = mapping.destination();
        let rule = match mapping {
            Mapping::Direct(_) => "direct",
            Mapping::Embedded(_) => "embedded",
            Mapping::Resolved(_) => "resolver",
        };
        rows.push(MappingRow {
            destination: destination.field().to_string(),
            kind: destination.kind(),
            rule,
            description: mapping.describe(),
            depth,
        });
        if let Mapping::Embedded(embedded) = mapping {
            collect_rows(&embedded.map, depth + 1, rows);
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
