use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

/// Header of the column holding the security symbol.
pub const SYMBOL_COLUMN: &str = "Security Symbol";
/// Header of the column holding the security name.
pub const NAME_COLUMN: &str = "Security Name";
/// Header of the column holding the security's total value on the report date.
pub const TOTAL_VALUE_COLUMN: &str = "Total Value";

/// Calendar date a report was produced for. Used as the value column key.
pub type ReportDate = NaiveDate;

/// One record read from a source report.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub symbol: String,
    pub name: String,
    pub total_value: f64,
}

impl InputRow {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, total_value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            total_value,
        }
    }

    /// Returns the identity pair of the row.
    pub fn key(&self) -> SecurityKey {
        SecurityKey::new(self.symbol.clone(), self.name.clone())
    }
}

/// Identity of a security across reports: the (symbol, name) pair.
///
/// Ordering compares the symbol first and the name second, both byte-wise, so
/// `"AAA" < "BBB" < "aaa"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecurityKey {
    pub symbol: String,
    pub name: String,
}

impl SecurityKey {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Borrowed view over one row of a [`MasterTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterRow<'a> {
    pub symbol: &'a str,
    pub name: &'a str,
    pub values: &'a BTreeMap<ReportDate, f64>,
}

impl MasterRow<'_> {
    /// Value recorded for `date`, if the column exists.
    pub fn value(&self, date: &ReportDate) -> Option<f64> {
        self.values.get(date).copied()
    }
}

/// Consolidated wide table: one row per security identity and one value
/// column per report date.
///
/// Both axes are kept in sorted containers so columns are always ascending by
/// date and rows ascending by (symbol, name), whatever order the reports were
/// folded in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterTable {
    pub(crate) dates: BTreeSet<ReportDate>,
    pub(crate) rows: BTreeMap<SecurityKey, BTreeMap<ReportDate, f64>>,
}

impl MasterTable {
    /// Creates an empty table with no rows and no date columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Date columns in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = &ReportDate> {
        self.dates.iter()
    }

    /// Number of date columns.
    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    /// Number of security rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, key: &SecurityKey) -> bool {
        self.rows.contains_key(key)
    }

    /// Value held for `key` on `date`.
    pub fn value(&self, key: &SecurityKey, date: &ReportDate) -> Option<f64> {
        self.rows.get(key).and_then(|values| values.get(date)).copied()
    }

    /// Rows in (symbol, name) order.
    pub fn rows(&self) -> impl Iterator<Item = MasterRow<'_>> {
        self.rows.iter().map(|(key, values)| MasterRow {
            symbol: &key.symbol,
            name: &key.name,
            values,
        })
    }

    /// Column headers: symbol, name, then each date as `YYYY-MM-DD`.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.dates.len() + 2);
        header.push(SYMBOL_COLUMN.to_string());
        header.push(NAME_COLUMN.to_string());
        header.extend(self.dates.iter().map(format_date));
        header
    }

    /// Materialises every row as text cells aligned with [`MasterTable::header`].
    /// Absent cells render as `0.0`.
    pub fn records(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| {
                let mut cells = Vec::with_capacity(self.dates.len() + 2);
                cells.push(row.symbol.to_string());
                cells.push(row.name.to_string());
                for date in &self.dates {
                    cells.push(format_value(row.value(date).unwrap_or(0.0)));
                }
                cells
            })
            .collect()
    }
}

/// Formats a report date the way it appears in column headers.
pub fn format_date(date: &ReportDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats a value cell. Integral values keep a single decimal (`100.0`),
/// everything else uses the shortest representation that round-trips.
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_keys_order_by_symbol_then_name_case_sensitively() {
        let mut keys = vec![
            SecurityKey::new("aaa", "Alpha"),
            SecurityKey::new("BBB", "Beta"),
            SecurityKey::new("AAA", "Zulu"),
            SecurityKey::new("AAA", "Alpha"),
        ];
        keys.sort();

        let symbols: Vec<(&str, &str)> = keys
            .iter()
            .map(|key| (key.symbol.as_str(), key.name.as_str()))
            .collect();
        assert_eq!(
            symbols,
            vec![
                ("AAA", "Alpha"),
                ("AAA", "Zulu"),
                ("BBB", "Beta"),
                ("aaa", "Alpha"),
            ]
        );
    }

    #[test]
    fn values_format_with_a_decimal_point() {
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(100.0), "100.0");
        assert_eq!(format_value(-42.0), "-42.0");
        assert_eq!(format_value(1234.56), "1234.56");
        assert_eq!(format_value(0.1), "0.1");
    }

    #[test]
    fn header_lists_dates_after_identity_columns() {
        let mut table = MasterTable::new();
        table
            .dates
            .insert(NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"));
        table
            .dates
            .insert(NaiveDate::from_ymd_opt(2023, 12, 29).expect("valid date"));

        assert_eq!(
            table.header(),
            vec![
                "Security Symbol",
                "Security Name",
                "2023-12-29",
                "2024-01-02"
            ]
        );
    }
}
