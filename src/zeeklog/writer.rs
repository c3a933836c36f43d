//! Streaming writer for Zeek logs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{FIELDS_DIRECTIVE, TYPES_DIRECTIVE};
use crate::error::Error;

/// Writes a Zeek log with the standard preamble and a `#close` trailer.
pub struct ZeekLogWriter<W: Write> {
    inner: W,
    columns: usize,
}

impl ZeekLogWriter<BufWriter<File>> {
    /// Create a log file at `file`.
    pub fn create<P: AsRef<Path>>(
        file: P,
        path_name: &str,
        fields: &[&str],
        types: &[&str],
    ) -> Result<Self, Error> {
        let out = BufWriter::new(File::create(file)?);
        Self::new(out, path_name, fields, types)
    }
}

impl<W: Write> ZeekLogWriter<W> {
    /// Write the preamble for a log named `path_name`.
    pub fn new(mut inner: W, path_name: &str, fields: &[&str], types: &[&str]) -> Result<Self, Error> {
        writeln!(inner, "#separator \t")?;
        writeln!(inner, "#set_separator ,")?;
        writeln!(inner, "#empty_field (empty)")?;
        writeln!(inner, "#unset_field -")?;
        writeln!(inner, "#path {path_name}")?;
        writeln!(inner, "#open 0")?;
        writeln!(inner, "{FIELDS_DIRECTIVE}\t{}", fields.join("\t"))?;
        writeln!(inner, "{TYPES_DIRECTIVE}\t{}", types.join("\t"))?;

        Ok(Self {
            inner,
            columns: fields.len(),
        })
    }

    /// Write one data row.
    pub fn write_row<S: AsRef<str>>(&mut self, values: &[S]) -> Result<(), Error> {
        debug_assert_eq!(values.len(), self.columns);
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.inner.write_all(b"\t")?;
            }
            self.inner.write_all(value.as_ref().as_bytes())?;
        }
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    /// Write the `#close` trailer and flush.
    pub fn finish(mut self) -> Result<W, Error> {
        writeln!(self.inner, "#close 0")?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}
