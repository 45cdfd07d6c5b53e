//! Terminal summary of a merge run.

use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use diary_transform::{JoinStage, MergeReport};

pub fn print_summary(report: &MergeReport, output: &Path) {
    println!("Output: {}", output.display());
    println!("{}", input_table(report));
    println!();
    println!("Joins:");
    println!("{}", stage_table(report));
    println!(
        "Merged rows: {} ({} columns, {} baseline subjects)",
        report.output_rows, report.output_columns, report.baseline_subjects
    );
    if report.has_warnings() {
        eprintln!("Warnings:");
        for warning in &report.warnings {
            eprintln!("- {warning}");
        }
    }
}

pub fn input_table(report: &MergeReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for input in &report.inputs {
        table.add_row(vec![
            Cell::new(input.label)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(input.path.display()),
            Cell::new(input.rows),
            Cell::new(input.columns),
        ]);
    }
    for (family, rows) in &report.reshaped {
        table.add_row(vec![
            Cell::new(format!("  -> {family}")).fg(Color::DarkGrey),
            dim_cell("long"),
            Cell::new(rows),
            dim_cell("-"),
        ]);
    }
    table
}

pub fn stage_table(report: &MergeReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Join"),
        header_cell("Left"),
        header_cell("Right"),
        header_cell("Output"),
        header_cell("Dropped"),
        header_cell("Duplicate keys"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for stage in &report.stages {
        table.add_row(vec![
            Cell::new(&stage.name),
            dim_cell(stage.policy.as_str()),
            Cell::new(stage.left_rows),
            Cell::new(stage.right_rows),
            output_cell(stage),
            count_cell(stage.dropped_rows(), Color::Yellow),
            duplicate_cell(stage),
        ]);
    }
    table
}

fn output_cell(stage: &JoinStage) -> Cell {
    if stage.output_rows == 0 {
        Cell::new(stage.output_rows)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else if stage.fanned_out() {
        Cell::new(stage.output_rows).fg(Color::Yellow)
    } else {
        Cell::new(stage.output_rows)
    }
}

fn duplicate_cell(stage: &JoinStage) -> Cell {
    if stage.duplicate_right_keys.is_empty() {
        return dim_cell("-");
    }
    let keys = &stage.duplicate_right_keys;
    let mut text = keys
        .iter()
        .take(5)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if keys.len() > 5 {
        text.push_str(&format!(", +{} more", keys.len() - 5));
    }
    Cell::new(text).fg(Color::Yellow)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
