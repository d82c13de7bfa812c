//! Table formatting for CLI output

use comfy_table::{Cell, Color, ContentArrangement, Table as ComfyTable};

/// Table for CLI output
#[derive(Debug, Clone)]
pub struct Table {
    inner: ComfyTable,
}

impl Table {
    /// Create a table with the given headers
    pub fn new(headers: &[&str]) -> Self {
        let mut inner = ComfyTable::new();
        inner
            .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)))
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120);
        Self { inner }
    }

    /// Add a row to the table
    pub fn add_row<I, S>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .add_row(row.into_iter().map(|cell| Cell::new(cell.into())));
        self
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
