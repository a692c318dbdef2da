use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw grid of text cells, as handed over by an external extractor
/// (browser DOM read, HTML parse, or PDF table extraction).
/// Rows may be ragged; nothing here is typed or cleaned yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Widest row in the grid. Ragged rows are padded up to this when the
    /// table is structured.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// All cells joined into one search string, for pattern-based table
    /// selection.
    pub fn flattened_text(&self) -> String {
        let mut joined = String::new();
        for row in &self.rows {
            for cell in row {
                if !joined.is_empty() {
                    joined.push(' ');
                }
                joined.push_str(cell);
            }
        }
        joined
    }
}

/// A single table value. Typing is decided column-wise, never per cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Textual rendering used for CSV fields and string matching.
    /// Missing renders as the empty field; numbers render dot-decimal.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Missing => Ok(()),
        }
    }
}

/// A table with a fixed header and rectangular rows.
/// Invariant: every row has exactly `header.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl StructuredTable {
    /// Build a table, padding or truncating each row to the header width.
    pub fn new(header: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = header.len();
        for row in &mut rows {
            row.resize(width, Cell::Missing);
        }
        Self { header, rows }
    }

    /// Build from text rows, padding short rows with empty text.
    pub fn from_text_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<Cell> = row.into_iter().map(Cell::Text).collect();
                cells.resize(width, Cell::Text(String::new()));
                cells.truncate(width);
                cells
            })
            .collect();
        Self { header, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Append a constant-valued text column, e.g. provenance fields.
    pub fn push_const_column(&mut self, name: &str, value: &str) {
        self.header.push(name.to_string());
        for row in &mut self.rows {
            row.push(Cell::Text(value.to_string()));
        }
    }

    /// Attach the provenance contract columns.
    pub fn with_provenance(mut self, source_url: &str, scraped_at: &str) -> Self {
        self.push_const_column("source_url", source_url);
        self.push_const_column("scraped_at", scraped_at);
        self
    }

    pub fn missing_value_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.iter())
            .filter(|c| c.is_missing())
            .count()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            row_count: self.rows.len(),
            missing_value_count: self.missing_value_count(),
        }
    }
}

/// Per-source summary record returned alongside every output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub row_count: usize,
    pub missing_value_count: usize,
}
