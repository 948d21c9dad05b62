//! # Terminal Output
//!
//! Everything the binary prints goes through here. Rendered pages go to
//! stdout untouched; status messages go to stderr through the
//! [`styles::QUIRE_THEME`] so that stdout stays pipeable.
//!
//! Spreadsheet previews are laid out in Rust (cell padding uses display width)
//! and styled by [`templates::WORKBOOK_TEMPLATE`].

use quire::writer::excel::{cell_address, column_name, Workbook, Worksheet};
use console::Term;
use serde::Serialize;
use stencil::{render, render_terminal, Target};
use unicode_width::UnicodeWidthStr;

pub mod styles;
pub mod templates;

use styles::QUIRE_THEME;
use templates::{MESSAGE_TEMPLATE, WORKBOOK_TEMPLATE};

#[derive(Debug, Clone, Copy)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageLevel {
    fn style(self) -> &'static str {
        match self {
            MessageLevel::Info => "info",
            MessageLevel::Success => "success",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        }
    }
}

#[derive(Serialize)]
struct MessageData<'a> {
    content: &'a str,
    level: &'a str,
}

#[derive(Serialize)]
struct GridCell {
    text: String,
    bold: bool,
}

#[derive(Serialize)]
struct GridLine {
    label: String,
    cells: Vec<GridCell>,
}

#[derive(Serialize)]
struct GridSheet {
    title: String,
    header: String,
    lines: Vec<GridLine>,
}

#[derive(Serialize)]
struct GridData {
    sheets: Vec<GridSheet>,
}

pub fn render_message(level: MessageLevel, content: &str, target: Target) -> String {
    let data = MessageData {
        content,
        level: level.style(),
    };
    render(MESSAGE_TEMPLATE, &data, &QUIRE_THEME, target).unwrap_or_else(|_| content.to_string())
}

/// Writes to stderr, colored only when stderr itself is a color terminal.
pub fn print_message(level: MessageLevel, content: &str) {
    let target = Target::for_term(&Term::stderr());
    eprintln!("{}", render_message(level, content, target));
}

fn pad(text: &str, width: usize) -> String {
    format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
}

fn grid_sheet(sheet: &Worksheet) -> GridSheet {
    let last_row = sheet.last_row();
    let label_width = last_row.to_string().len();
    let columns: Vec<(String, usize)> = (0..sheet.column_count())
        .map(|c| {
            let name = column_name(c);
            let width = sheet.column_width(&name).unwrap_or(0).max(name.width());
            (name, width)
        })
        .collect();

    let header = std::iter::once(" ".repeat(label_width))
        .chain(columns.iter().map(|(name, width)| pad(name, *width)))
        .collect::<Vec<_>>()
        .join(" ");

    let lines = (1..=last_row)
        .map(|row| GridLine {
            label: pad(&row.to_string(), label_width),
            cells: columns
                .iter()
                .enumerate()
                .map(|(c, (_, width))| match sheet.cell(&cell_address(c, row)) {
                    Some(cell) => GridCell {
                        text: pad(cell.value(), *width),
                        bold: cell.is_bold(),
                    },
                    None => GridCell {
                        text: " ".repeat(*width),
                        bold: false,
                    },
                })
                .collect(),
        })
        .collect();

    GridSheet {
        title: sheet.title().to_string(),
        header,
        lines,
    }
}

/// A plain-text grid per sheet, with column letters and row numbers.
pub fn render_workbook(workbook: &Workbook) -> String {
    let data = GridData {
        sheets: workbook.sheets().iter().map(grid_sheet).collect(),
    };
    render_terminal(WORKBOOK_TEMPLATE, &data, &QUIRE_THEME, &Term::stdout())
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire::field::{Field, FieldBearer};
    use quire::row::Row;
    use quire::table::Table;

    #[test]
    fn message_color_follows_the_target() {
        let colored = render_message(
            MessageLevel::Error,
            "Error: boom",
            Target::Terminal { color: true },
        );
        assert!(colored.contains("\x1b["));
        assert!(colored.contains("Error: boom"));

        let plain = render_message(
            MessageLevel::Error,
            "Error: boom",
            Target::Terminal { color: false },
        );
        assert_eq!(plain, "Error: boom");
    }

    #[test]
    fn grid_pads_cells_to_column_width() {
        let table = Table::new(
            "people",
            vec![Row::new(FieldBearer::new(vec![
                Field::literal("name", "Ada Lovelace"),
                Field::literal("id", 1),
            ]))],
        );
        let mut workbook = Workbook::new();
        workbook.add_table(&table, "none");

        let grid = grid_sheet(&workbook.sheets()[0]);
        assert_eq!(grid.header, "  A            B ");
        assert_eq!(grid.lines.len(), 2);
        assert_eq!(grid.lines[0].cells[0].text, "name        ");
        assert!(grid.lines[0].cells[0].bold);
        assert_eq!(grid.lines[1].cells[1].text, "1 ");
    }
}
