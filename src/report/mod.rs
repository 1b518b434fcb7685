use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, TableComponent};

use crate::aggregate::Breakdown;

/// How the breakdown is rendered. Selected by flag, never by data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Plain,
    Table,
}

/// Currency suffix shown after table amounts.
const CURRENCY: &str = "€";

pub(crate) fn print(breakdown: &Breakdown, mode: Mode) {
    match mode {
        Mode::Plain => print_plain(breakdown),
        Mode::Table => print_table(breakdown),
    }
}

/// `label: pp.pp%` lines.
fn print_plain(breakdown: &Breakdown) {
    println!();
    for row in &breakdown.rows {
        println!("{}: {:.2}%", row.bucket.label(), row.percentage);
    }
    println!();
}

fn print_table(breakdown: &Breakdown) {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);

    table.set_header(vec![
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Percentage").fg(Color::Cyan),
    ]);

    for row in &breakdown.rows {
        table.add_row(vec![
            Cell::new(row.bucket.label()),
            Cell::new(format_amount(row.amount).as_str()).set_alignment(CellAlignment::Right),
            Cell::new(format_percentage(row.percentage).as_str()).set_alignment(CellAlignment::Right),
        ]);
    }

    let percentage_total: f64 = breakdown.rows.iter().map(|row| row.percentage).sum();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(format_amount(breakdown.total).as_str())
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new(format_percentage(percentage_total).as_str())
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]);

    println!("{table}");
}

/// Minor units to a major-unit currency string. The sign is discarded,
/// table mode shows spending as magnitude.
fn format_amount(minor_units: i64) -> String {
    format!("{:.2} {CURRENCY}", minor_units.abs() as f64 / 100.0)
}

fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.2}%")
}
