//! Spreadsheet layout of tables.
//!
//! A [`Workbook`] is the cell-level model an xlsx encoder consumes: sheets of
//! addressed cells with a bold flag, plus one width per used column.

use crate::table::Table;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use unicode_width::UnicodeWidthStr;

/// Spreadsheet letters for a 0-based column index: `A`..`Z`, `AA`, `AB`...
pub fn column_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// `A1`-style address for a 0-based column and 1-based row.
pub fn cell_address(column: usize, row: usize) -> String {
    format!("{}{}", column_name(column), row)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    address: String,
    column: usize,
    row: usize,
    value: String,
    bold: bool,
}

impl Cell {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Worksheet {
    title: String,
    #[serde(serialize_with = "cells_in_order")]
    cells: BTreeMap<(usize, usize), Cell>,
    column_widths: BTreeMap<String, usize>,
}

impl Worksheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Writes a cell at a 0-based column and 1-based row, replacing any value there.
    pub fn set(&mut self, column: usize, row: usize, value: impl Into<String>, bold: bool) {
        self.cells.insert(
            (row, column),
            Cell {
                address: cell_address(column, row),
                column,
                row,
                value: value.into(),
                bold,
            },
        );
    }

    pub fn cell(&self, address: &str) -> Option<&Cell> {
        self.cells.values().find(|c| c.address == address)
    }

    /// Cells row by row, left to right.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Highest used row, 0 when empty.
    pub fn last_row(&self) -> usize {
        self.cells.keys().map(|(row, _)| *row).max().unwrap_or(0)
    }

    /// Number of used columns.
    pub fn column_count(&self) -> usize {
        self.cells
            .keys()
            .map(|(_, column)| column + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn column_width(&self, column: &str) -> Option<usize> {
        self.column_widths.get(column).copied()
    }

    /// Sizes every used column to its widest cell.
    pub fn auto_size(&mut self) {
        self.column_widths.clear();
        for cell in self.cells.values() {
            let width = cell.value.width();
            let entry = self
                .column_widths
                .entry(column_name(cell.column))
                .or_insert(0);
            *entry = (*entry).max(width);
        }
    }
}

fn cells_in_order<S: Serializer>(
    cells: &BTreeMap<(usize, usize), Cell>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(cells.values())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    /// Adds a sheet for `table`.
    ///
    /// Row 1 holds the labels of the first row's visible fields in bold; each
    /// table row follows on its own line, skipping empty values. A table with
    /// no rows gets `no_records` in `A1`.
    pub fn add_table(&mut self, table: &Table, no_records: &str) {
        let mut sheet = Worksheet::new(table.id());

        match table.rows().first() {
            None => sheet.set(0, 1, no_records, false),
            Some(first) => {
                for (column, field) in first.field_bearer().visible_fields().iter().enumerate() {
                    sheet.set(column, 1, field.label(), true);
                }
                for (offset, row) in table.rows().iter().enumerate() {
                    for (column, field) in row.field_bearer().visible_fields().iter().enumerate() {
                        if !field.initial().is_empty() {
                            sheet.set(column, offset + 2, field.initial().to_string(), false);
                        }
                    }
                }
            }
        }

        sheet.auto_size();
        self.sheets.push(sheet);
    }
}
