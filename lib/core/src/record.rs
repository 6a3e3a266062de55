use crate::config::FieldMapping;
use serde::{Deserialize, Serialize};

/// One observation of a user engaging with an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: String,
    pub item_id: String,
    pub behavior: String,
    /// Cumulative usage, e.g. hours played
    pub magnitude: f64,
}

impl InteractionRecord {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        behavior: impl Into<String>,
        magnitude: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            behavior: behavior.into(),
            magnitude,
        }
    }
}

/// A column-labelled batch of untyped rows, as handed over by a loader.
///
/// Rows may be shorter or longer than `columns`; the filter decides what
/// to do with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecords {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawRecords {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

impl From<Vec<InteractionRecord>> for RawRecords {
    fn from(records: Vec<InteractionRecord>) -> Self {
        let columns = FieldMapping::default()
            .pairs()
            .iter()
            .map(|(_, column)| column.to_string())
            .collect();
        let rows = records
            .into_iter()
            .map(|r| vec![r.user_id, r.item_id, r.behavior, r.magnitude.to_string()])
            .collect();
        Self { columns, rows }
    }
}
