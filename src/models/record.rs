use serde::Serialize;
use std::collections::HashMap;

/// One CSV row keyed by column header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a column, `""` when the column does not exist
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value of a column
    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).trim()
    }

    /// The column exists and holds a non-empty value
    pub fn present(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    /// Value of a column when present
    pub fn opt(&self, name: &str) -> Option<&str> {
        Some(self.get(name)).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builds a record from `(column, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A CSV file: header order plus its rows
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}
