//! Report table: two family columns laid side by side.
//!
//! Row `i` pairs the i-th index family with the i-th data stream family.
//! The columns are independent orderings; nothing is joined.

mod output;

pub use output::{emit, render, ReportRecord};

/// Fill value for the shorter column.
pub const BLANK: &str = "";

pub const HEADER: [&str; 2] = ["Indices", "Data Streams"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub index: String,
    pub data_stream: String,
}

impl ReportRow {
    pub fn new(index: impl Into<String>, data_stream: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            data_stream: data_stream.into(),
        }
    }

    pub fn cells(&self) -> [&str; 2] {
        [&self.index, &self.data_stream]
    }
}

/// Rectangular table: the fixed header plus `max(m, n)` rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn header(&self) -> [&'static str; 2] {
        HEADER
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lay the two family lists side by side, padding the shorter with [`BLANK`].
pub fn align<I, D>(index_families: &[I], data_stream_families: &[D]) -> ReportTable
where
    I: AsRef<str>,
    D: AsRef<str>,
{
    let n = index_families.len().max(data_stream_families.len());
    let cell = |column: Option<&str>| column.unwrap_or(BLANK).to_string();

    let rows = (0..n)
        .map(|i| ReportRow {
            index: cell(index_families.get(i).map(AsRef::as_ref)),
            data_stream: cell(data_stream_families.get(i).map(AsRef::as_ref)),
        })
        .collect();

    ReportTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_pads_data_streams() {
        let table = align(&["app", "logs"], &["app"]);
        assert_eq!(
            table.rows(),
            [ReportRow::new("app", "app"), ReportRow::new("logs", BLANK)]
        );
    }

    #[test]
    fn test_align_pads_indices() {
        let table = align::<&str, _>(&[], &["nginx", "system", "app"]);
        assert_eq!(table.len(), 3);
        assert!(table.rows().iter().all(|row| row.index == BLANK));
        assert_eq!(table.rows()[2].data_stream, "app");
    }

    #[test]
    fn test_align_empty() {
        let table = align::<&str, &str>(&[], &[]);
        assert!(table.is_empty());
        assert_eq!(table.header(), ["Indices", "Data Streams"]);
    }

    #[test]
    fn test_align_row_count_is_max_of_lengths() {
        for m in 0..5 {
            for n in 0..5 {
                let left: Vec<String> = (0..m).map(|i| format!("i{}", i)).collect();
                let right: Vec<String> = (0..n).map(|i| format!("d{}", i)).collect();
                let table = align(&left, &right);
                assert_eq!(table.len(), m.max(n));
                for (i, row) in table.rows().iter().enumerate() {
                    let expected_index = left.get(i).map(String::as_str).unwrap_or(BLANK);
                    let expected_stream = right.get(i).map(String::as_str).unwrap_or(BLANK);
                    assert_eq!(row.cells(), [expected_index, expected_stream]);
                }
            }
        }
    }
}
