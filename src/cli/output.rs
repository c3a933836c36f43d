//! Output formatting for log pages.
//!
//! Pages print as a table, CSV, or a single JSON document carrying the
//! paging metadata alongside the rows.

use std::io::Write;

use clap::ValueEnum;

use crate::query::LogPage;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table (default)
    Table,
    /// Comma-separated values
    Csv,
    /// JSON document with fields, paging and rows
    Json,
}

/// Formats query results for output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a page and write it to the given writer.
    pub fn write<W: Write>(&self, page: &LogPage, writer: &mut W) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(page, writer),
            OutputFormat::Csv => self.write_csv(page, writer),
            OutputFormat::Json => self.write_json(page, writer),
        }
    }

    fn write_table<W: Write>(&self, page: &LogPage, writer: &mut W) -> std::io::Result<()> {
        use comfy_table::{Cell, Table};

        let mut table = Table::new();
        table.set_header(page.fields.iter().map(Cell::new));

        for row in &page.rows {
            table.add_row(page.fields.iter().map(|field| Cell::new(row.get(field))));
        }

        writeln!(writer, "{table}")?;
        writeln!(
            writer,
            "rows {}-{} of {}",
            if page.rows.is_empty() { page.offset } else { page.offset + 1 },
            page.offset + page.rows.len(),
            page.total
        )
    }

    fn write_csv<W: Write>(&self, page: &LogPage, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", page.fields.join(","))?;

        for row in &page.rows {
            let values: Vec<String> = page
                .fields
                .iter()
                .map(|field| {
                    let value = row.get(field);
                    // Escape commas and quotes
                    if value.contains(',') || value.contains('"') || value.contains('\n') {
                        format!("\"{}\"", value.replace('"', "\"\""))
                    } else {
                        value.to_string()
                    }
                })
                .collect();
            writeln!(writer, "{}", values.join(","))?;
        }

        Ok(())
    }

    fn write_json<W: Write>(&self, page: &LogPage, writer: &mut W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, page)?;
        writeln!(writer)
    }
}
