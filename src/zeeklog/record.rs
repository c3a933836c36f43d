//! Decoded log rows.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::SEPARATOR;

/// One row decoded against a field list.
///
/// Rows shorter than the field list read as empty strings in the missing
/// columns; extra columns are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    fields: &'a [String],
    values: Vec<&'a str>,
}

impl<'a> Record<'a> {
    /// Decode a data line against `fields`.
    pub fn reconcile(fields: &'a [String], line: &'a str) -> Self {
        let mut values: Vec<&'a str> = line.split(SEPARATOR).take(fields.len()).collect();
        values.resize(fields.len(), "");
        Self { fields, values }
    }

    /// Decode a line of a log that has no `#fields` line.
    ///
    /// The whole line becomes the value of the first (synthetic) field.
    pub fn raw(fields: &'a [String], line: &'a str) -> Self {
        let mut values = vec![""; fields.len()];
        if let Some(first) = values.first_mut() {
            *first = line;
        }
        Self { fields, values }
    }

    /// Value of `field`, or `""` when the field is unknown.
    pub fn get(&self, field: &str) -> &'a str {
        self.fields
            .iter()
            .position(|f| f == field)
            .map(|i| self.values[i])
            .unwrap_or("")
    }

    /// Every value, in field order.
    pub fn values(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.values.iter().copied()
    }

    /// `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.fields.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Copy into an owned record.
    pub fn to_owned_record(&self) -> OwnedRecord {
        OwnedRecord(
            self.iter()
                .map(|(f, v)| (f.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// A decoded row that owns its data.
///
/// Serializes as a map in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedRecord(pub Vec<(String, String)>);

impl OwnedRecord {
    /// Value of `field`, or `""` when the field is unknown.
    pub fn get(&self, field: &str) -> &str {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }
}

impl Serialize for OwnedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
