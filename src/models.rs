use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// In-memory tabular data as handed over by the I/O boundary: one header row
/// plus data rows. Rows may be ragged (shorter or longer than the header);
/// consumers address cells through [`Table::cell`], which treats a missing
/// cell as absent rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Case-insensitive header lookup, ignoring surrounding whitespace.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }
}

/// Matcher-facing view of one table row: a stable position, the raw name,
/// and the token set derived from it.
#[derive(Debug, Clone)]
pub struct NamedRecord {
    pub id: usize,
    pub name: Option<String>,
    pub tokens: BTreeSet<String>,
}

impl NamedRecord {
    /// A name consisting only of whitespace counts as absent.
    pub fn has_name(&self) -> bool {
        self.name
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_is_case_insensitive() {
        let t = Table::new(
            vec!["Name".into(), " City ".into()],
            vec![vec!["Acme".into(), "Springfield".into()]],
        );
        assert_eq!(t.column_index("name"), Some(0));
        assert_eq!(t.column_index("CITY"), Some(1));
        assert_eq!(t.column_index("zip"), None);
    }

    #[test]
    fn ragged_rows_read_as_missing_cells() {
        let t = Table::new(
            vec!["Name".into(), "City".into()],
            vec![vec!["Acme".into()]],
        );
        assert_eq!(t.cell(0, 0), Some("Acme"));
        assert_eq!(t.cell(0, 1), None);
        assert_eq!(t.cell(1, 0), None);
    }

    #[test]
    fn blank_name_counts_as_absent() {
        let r = NamedRecord {
            id: 0,
            name: Some("   ".into()),
            tokens: BTreeSet::new(),
        };
        assert!(!r.has_name());
        let r = NamedRecord {
            id: 1,
            name: Some("Acme".into()),
            tokens: BTreeSet::new(),
        };
        assert!(r.has_name());
    }
}
