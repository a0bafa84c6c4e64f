use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hospnet_cli::walk::StepReport;
use hospnet_model::Department;
use hospnet_validate::FieldError;

pub fn print_step_report(workflow_name: &str, reports: &[StepReport]) {
    println!("Fluxo: {workflow_name}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Etapa"),
        header_cell("Status"),
        header_cell("Campo"),
        header_cell("Mensagem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for report in reports {
        let (status, field, message) = match &report.error {
            None => (Cell::new("ok").fg(Color::Green), Cell::new(""), Cell::new("")),
            Some(error) => (
                Cell::new("erro").fg(Color::Red).add_attribute(Attribute::Bold),
                Cell::new(&error.field),
                Cell::new(&error.message),
            ),
        };
        table.add_row(vec![
            Cell::new(report.index + 1),
            Cell::new(&report.title),
            status,
            field,
            message,
        ]);
    }
    println!("{table}");
}

pub fn print_blocked(step: usize, title: &str, error: &FieldError) {
    eprintln!("Etapa {} ({title}) não concluída", step + 1);
    eprintln!("  {}: {}", error.field, error.message);
}

pub fn print_departments() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Id"), header_cell("Departamento")]);
    apply_table_style(&mut table);
    for department in Department::all() {
        table.add_row(vec![
            Cell::new(department.id()).fg(Color::Blue),
            Cell::new(department.label()),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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
