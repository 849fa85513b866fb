// src/dashboard/table.rs
use crate::model::{JobRecord, CLEAN_COLUMNS};
use serde::Serialize;

/// The cleaned dataset as the dashboard sees it: named columns of text.
///
/// Columns are looked up by name so a file missing one column only disables
/// the views that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl JobTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_records(records: &[JobRecord]) -> Self {
        Self {
            headers: CLEAN_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: records
                .iter()
                .map(|r| r.cells().iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
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

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of one column, or `None` when the column is absent. Short rows
    /// read as empty cells.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Rows where any cell contains `term`, ignoring case. An empty term keeps every row.
    pub fn search(&self, term: &str) -> JobTable {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        let rows = self
            .rows
            .iter()
            .filter(|row| row.iter().any(|cell| cell.to_lowercase().contains(&needle)))
            .cloned()
            .collect();
        JobTable::new(self.headers.clone(), rows)
    }

    pub fn head(&self, n: usize) -> JobTable {
        JobTable::new(self.headers.clone(), self.rows.iter().take(n).cloned().collect())
    }
}
