use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use geolab_client::ReportSummary;
use geolab_model::ProgressSummary;
use serde_json::Value;

pub fn print_progress(title: &str, progress: &ProgressSummary) {
    println!("{title}: {}% complete", progress.completion);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Ready"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for section in &progress.sections {
        table.add_row(vec![
            Cell::new(section.label),
            ready_cell(section.ready),
            section
                .detail
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{}/{}",
            progress.ready_count(),
            progress.sections.len()
        ))
        .add_attribute(Attribute::Bold),
        Cell::new(format!("{}%", progress.completion)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// Prints the members of a JSON object as a name/value table.
pub fn print_values(title: &str, values: &Value) {
    let Value::Object(map) = values else {
        println!("{title}: {}", display_value(values));
        return;
    };
    let mut table = Table::new();
    table.set_header(vec![header_cell(title), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, value) in map {
        let cell = if value.is_null() {
            dim_cell("-")
        } else {
            Cell::new(display_value(value))
        };
        table.add_row(vec![Cell::new(name), cell]);
    }
    println!("{table}");
}

pub fn print_reports(reports: &[ReportSummary]) {
    if reports.is_empty() {
        println!("No reports found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Report"),
        header_cell("Work order"),
        header_cell("Sample"),
        header_cell("Client"),
        header_cell("Status"),
        header_cell("Updated"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for report in reports {
        table.add_row(vec![
            Cell::new(report.id),
            text_cell(&report.report_number),
            text_cell(&report.work_order),
            optional_cell(report.sample_code.as_deref()),
            optional_cell(report.client.as_deref()),
            text_cell(&report.status),
            optional_cell(
                report
                    .updated_at
                    .as_deref()
                    .or(report.created_at.as_deref()),
            ),
        ]);
    }
    println!("{table}");
    println!("{} report(s)", reports.len());
}

/// Arrays are joined, `null` entries shown as `-`.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn ready_cell(ready: bool) -> Cell {
    if ready {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("·")
    }
}

fn text_cell(value: &str) -> Cell {
    if value.trim().is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), text_cell)
}
