use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::InspectResult;

pub fn print_inspect(result: &InspectResult) {
    if let Some(name) = &result.name {
        println!("Map: {name}");
    }
    println!(
        "Kinds: source={} destination={}",
        result.source_kind, result.destination_kind
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Destination"),
        header_cell("Kind"),
        header_cell("Rule"),
        header_cell("Mapping"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for (index, row) in result.rows.iter().enumerate() {
        let indent = "  ".repeat(row.depth);
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(format!("{indent}{}", row.destination)),
            Cell::new(row.kind),
            rule_cell(row.rule),
            Cell::new(&row.description),
        ]);
    }
    println!("{table}");
    println!("{} mapping(s)", result.rows.len());
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn rule_cell(rule: &str) -> Cell {
    let color = match rule {
        "embedded" => Color::Magenta,
        "resolver" => Color::Yellow,
        _ => Color::Green,
    };
    Cell::new(rule).fg(color)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
