use std::fs;

use anyhow::{Context, Result};
use fieldmap_cli::pipeline::{
    MappingRow, apply_definition, describe_map, read_record, render_record,
};
use fieldmap_core::{MapDefinition, Record, ReferenceKind};
use tracing::{info, info_span};

use crate::cli::{ApplyArgs, InspectArgs};

pub fn run_apply(args: &ApplyArgs) -> Result<()> {
    let span = info_span!("apply", map = %args.map.display());
    let _guard = span.enter();

    let definition = MapDefinition::from_path(&args.map)?;
    let source = read_record(&args.source)?;
    let destination = match &args.destination {
        Some(path) => read_record(path)?,
        None => Record::new(),
    };

    let mapped = apply_definition(definition, &source, &destination)?;
    let rendered = render_record(&mapped, args.compact)?;
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), fields = mapped.len(), "wrote mapped record");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

pub struct InspectResult {
    pub name: Option<String>,
    pub source_kind: ReferenceKind,
    pub destination_kind: ReferenceKind,
    pub rows: Vec<MappingRow>,
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectResult> {
    let definition = MapDefinition::from_path(&args.map)?;
    let (source_kind, destination_kind) = definition.reference_kinds()?;
    let map = definition.compile().context("compile map definition")?;
    Ok(InspectResult {
        name: definition.name,
        source_kind,
        destination_kind,
        rows: describe_map(&map),
    })
}
