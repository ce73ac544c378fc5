//! Grid rendering for table rows and query results.

use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::editor::TableView;
use crate::domain::cell::DisplayRow;
use crate::domain::grid::SortDirection;

/// Render rows under `columns` with a leading 1-based `#` column.
pub fn render(columns: &[&str], rows: &[DisplayRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record(std::iter::once("#").chain(columns.iter().copied()));
    for (i, row) in rows.iter().enumerate() {
        builder.push_record(
            std::iter::once((i + 1).to_string()).chain(row.iter().map(ToString::to_string)),
        );
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Print a result set, as a table or as one JSON line.
pub fn print_rows(kind: &str, columns: &[&str], rows: &[DisplayRow]) {
    if output::is_json() {
        output::json_output(kind, json!({ "columns": columns, "rows": rows }));
        return;
    }
    output::block(&render(columns, rows));
    output::note(&match rows.len() {
        1 => "1 row".to_string(),
        n => format!("{n} rows"),
    });
}

/// Print the table currently shown by the editor.
pub fn print_view(view: &TableView, sort: Option<(&str, SortDirection)>) {
    if !output::is_json() {
        let title = match sort {
            Some((column, direction)) => format!(
                "{} {}",
                view.descriptor.name,
                output::muted(format!("(by {column} {direction})"))
            ),
            None => view.descriptor.name.clone(),
        };
        output::section(&title);
    }
    print_rows("table", &view.descriptor.column_names(), &view.rows);
}

#[derive(Tabled)]
struct TableEntry<'a> {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Table")]
    name: &'a str,
}

/// Print the table list in catalog order.
pub fn print_tables(names: &[String]) {
    if output::is_json() {
        output::json_output("tables", json!({ "tables": names }));
        return;
    }
    if names.is_empty() {
        output::note("no tables");
        return;
    }
    let entries = names.iter().enumerate().map(|(i, name)| TableEntry {
        position: i + 1,
        name,
    });
    let mut table = Table::new(entries);
    table.with(Style::rounded());
    output::block(&table.to_string());
}
