//! Parsing Zeek logs into header, fields and rows.

use std::fs;
use std::path::Path;

use super::record::Record;
use super::{FIELDS_DIRECTIVE, META_PREFIX, RAW_FIELD, SEPARATOR, TIMESTAMP_FIELD};
use crate::error::Error;

/// A parsed Zeek log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZeekLog {
    /// Every metadata line, in file order.
    pub header: Vec<String>,

    /// Field names from the `#fields` line, if any.
    pub fields: Option<Vec<String>>,

    /// Data lines as stored (not reconciled with `fields`).
    pub rows: Vec<String>,
}

impl ZeekLog {
    /// Parse log text.
    ///
    /// Lines end at `\n` only, so a `\r` stays part of the line. Empty lines
    /// are skipped. If several `#fields` lines appear the last one wins.
    pub fn parse(text: &str) -> Self {
        let mut log = ZeekLog::default();

        for line in text.split('\n') {
            if line.starts_with(META_PREFIX) {
                if line.starts_with(FIELDS_DIRECTIVE) {
                    log.fields = Some(line.split(SEPARATOR).skip(1).map(str::to_string).collect());
                }
                log.header.push(line.to_string());
                continue;
            }
            if line.is_empty() {
                continue;
            }
            log.rows.push(line.to_string());
        }

        log
    }

    /// Read and parse a log file. Invalid UTF-8 is replaced, not rejected.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let bytes = fs::read(path)?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Field names rows are decoded against.
    ///
    /// Logs without a `#fields` line expose a single synthetic field.
    pub fn field_names(&self) -> Vec<String> {
        match &self.fields {
            Some(fields) => fields.clone(),
            None => vec![RAW_FIELD.to_string()],
        }
    }

    /// Column index of a field, if the log declares it.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.as_ref()?.iter().position(|f| f == name)
    }

    /// Column index of the `ts` field.
    pub fn timestamp_index(&self) -> Option<usize> {
        self.field_index(TIMESTAMP_FIELD)
    }

    /// Decode every row against `fields`, in file order.
    pub fn records<'a>(&'a self, fields: &'a [String]) -> impl Iterator<Item = Record<'a>> + 'a {
        let raw = self.fields.is_none();
        self.rows.iter().map(move |line| {
            if raw {
                Record::raw(fields, line)
            } else {
                Record::reconcile(fields, line)
            }
        })
    }

    /// Value in column `index` of a data line, if present.
    pub fn column(line: &str, index: usize) -> Option<&str> {
        line.split(SEPARATOR).nth(index)
    }

    /// Render the log: header lines, then one line per row.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for row in &self.rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    /// Write the log to `path`.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        fs::write(path, self.to_text())?;
        Ok(())
    }
}
