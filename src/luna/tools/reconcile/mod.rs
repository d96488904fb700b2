use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::luna::tools::model::{InputRow, MasterTable, ReportDate, SecurityKey};

/// Folds one report into the accumulated table.
///
/// The identities of `rows` are first unioned into the table, new securities
/// receiving `0.0` for every date already present. The report's values are
/// then joined onto every row under `date`: securities absent from this report
/// get `0.0`. A date that already exists is replaced as a whole column, so a
/// later report for the same date wins.
pub fn merge(mut master: MasterTable, rows: &[InputRow], date: ReportDate) -> MasterTable {
    let contributions = distinct_values(rows);

    let mut added = 0usize;
    for key in contributions.keys() {
        if !master.rows.contains_key(key) {
            let values = master.dates.iter().map(|existing| (*existing, 0.0)).collect();
            master.rows.insert(key.clone(), values);
            added += 1;
        }
    }

    if !master.dates.insert(date) {
        warn!(%date, "report date already consolidated, replacing its column");
    }

    for (key, values) in master.rows.iter_mut() {
        let value = contributions.get(key).copied().unwrap_or(0.0);
        values.insert(date, value);
    }

    debug!(
        %date,
        report_rows = rows.len(),
        new_securities = added,
        securities = master.rows.len(),
        "report merged"
    );
    master
}

/// Completes a table after the last merge: every row gets a value for every
/// date column. Both axes are already held in ascending order.
pub fn finalize(mut master: MasterTable) -> MasterTable {
    let mut filled = 0usize;
    for values in master.rows.values_mut() {
        for date in &master.dates {
            values.entry(*date).or_insert_with(|| {
                filled += 1;
                0.0
            });
        }
    }
    if filled > 0 {
        warn!(cells = filled, "filled absent cells with zero");
    }
    master
}

/// Reduces a report to one value per identity. When an identity repeats the
/// last occurrence is kept.
fn distinct_values(rows: &[InputRow]) -> BTreeMap<SecurityKey, f64> {
    let mut values = BTreeMap::new();
    for row in rows {
        if values.insert(row.key(), row.total_value).is_some() {
            warn!(
                symbol = %row.symbol,
                name = %row.name,
                "duplicate security in report, keeping the last value"
            );
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> ReportDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date")
    }

    fn key(symbol: &str, name: &str) -> SecurityKey {
        SecurityKey::new(symbol, name)
    }

    #[test]
    fn new_securities_are_back_filled_with_zero() {
        let master = merge(
            MasterTable::new(),
            &[InputRow::new("AAA", "Alpha", 100.0)],
            date(1),
        );
        let master = merge(master, &[InputRow::new("CCC", "Gamma", 30.0)], date(2));

        assert_eq!(master.value(&key("CCC", "Gamma"), &date(1)), Some(0.0));
        assert_eq!(master.value(&key("CCC", "Gamma"), &date(2)), Some(30.0));
        assert_eq!(master.value(&key("AAA", "Alpha"), &date(2)), Some(0.0));
    }

    #[test]
    fn same_symbol_with_different_name_is_a_distinct_security() {
        let master = merge(
            MasterTable::new(),
            &[
                InputRow::new("AAA", "Alpha", 1.0),
                InputRow::new("AAA", "Alpha Holdings", 2.0),
            ],
            date(1),
        );

        assert_eq!(master.len(), 2);
        assert_eq!(master.value(&key("AAA", "Alpha Holdings"), &date(1)), Some(2.0));
    }

    #[test]
    fn repeated_identity_keeps_last_value() {
        let master = merge(
            MasterTable::new(),
            &[
                InputRow::new("AAA", "Alpha", 1.0),
                InputRow::new("AAA", "Alpha", 5.0),
            ],
            date(1),
        );

        assert_eq!(master.len(), 1);
        assert_eq!(master.value(&key("AAA", "Alpha"), &date(1)), Some(5.0));
    }

    #[test]
    fn colliding_date_replaces_whole_column() {
        let master = merge(
            MasterTable::new(),
            &[
                InputRow::new("AAA", "Alpha", 100.0),
                InputRow::new("BBB", "Beta", 50.0),
            ],
            date(1),
        );
        let master = merge(master, &[InputRow::new("AAA", "Alpha", 7.0)], date(1));

        assert_eq!(master.date_count(), 1);
        assert_eq!(master.value(&key("AAA", "Alpha"), &date(1)), Some(7.0));
        assert_eq!(master.value(&key("BBB", "Beta"), &date(1)), Some(0.0));
    }

    #[test]
    fn finalize_fills_cells_left_unset() {
        let mut master = merge(
            MasterTable::new(),
            &[InputRow::new("AAA", "Alpha", 100.0)],
            date(1),
        );
        master.dates.insert(date(3));

        let master = finalize(master);

        assert_eq!(master.value(&key("AAA", "Alpha"), &date(3)), Some(0.0));
    }
}
