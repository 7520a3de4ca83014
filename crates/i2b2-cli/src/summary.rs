use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use i2b2_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Date mode: {}", result.datemode);
    println!("Concepts: {}", result.concepts_path.display());
    println!("Facts: {}", result.facts_path.display());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Item"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    let synthesis = &result.synthesis;
    let mapping = &result.mapping;
    let rows = [
        ("Dictionary", "variables", result.variables, None),
        ("Synthesis", "assertion concepts", synthesis.assertion_concepts, None),
        ("Synthesis", "value concepts", synthesis.value_concepts, None),
        ("Synthesis", "truncated codes", synthesis.truncated_codes, Some(Color::Yellow)),
        ("Synthesis", "skipped tokens", synthesis.skipped_tokens, Some(Color::Yellow)),
        ("Synthesis", "suppressed concepts", result.suppressed_concepts, None),
        ("Mapping", "rows", mapping.rows, None),
        ("Mapping", "blank cells", mapping.blank_cells, None),
        ("Mapping", "index hits", mapping.index_hits, None),
        ("Mapping", "scalar fallbacks", mapping.scalar_fallbacks, None),
        ("Mapping", "column fallbacks", mapping.column_fallbacks, Some(Color::Yellow)),
        ("Mapping", "ICD codes", mapping.icd_overrides, None),
        ("Mapping", "demographic codes", mapping.demographic_overrides, None),
        ("Mapping", "unresolved dates", mapping.unresolved_dates, Some(Color::Red)),
    ];
    for (stage, item, count, color) in rows {
        table.add_row(vec![stage_cell(stage), Cell::new(item), count_cell(count, color)]);
    }
    for (kind, count) in &mapping.anomalies {
        table.add_row(vec![
            stage_cell("Dates"),
            Cell::new(kind),
            count_cell(*count, Some(Color::Yellow)),
        ]);
    }
    table.add_row(vec![
        total_cell("CONCEPTS"),
        dim_cell("written"),
        Cell::new(result.concepts_written).add_attribute(Attribute::Bold),
    ]);
    let facts_label = if result.facts_written < result.facts_mapped {
        format!("written (sampled from {})", result.facts_mapped)
    } else {
        "written".to_string()
    };
    table.add_row(vec![
        total_cell("FACTS"),
        dim_cell(facts_label),
        Cell::new(result.facts_written).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Option<Color>) -> Cell {
    match color {
        Some(color) if count > 0 => Cell::new(count).fg(color).add_attribute(Attribute::Bold),
        _ if count == 0 => dim_cell(count),
        _ => Cell::new(count),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(stage: &str) -> Cell {
    Cell::new(stage)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn total_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
