use std::path::Path;

use calamine::{DataType, Reader, open_workbook_auto};
use tracing::{debug, instrument};

use crate::luna::tools::error::{Result, ToolError};
use crate::luna::tools::model::{InputRow, NAME_COLUMN, SYMBOL_COLUMN, TOTAL_VALUE_COLUMN};

/// Reads the report rows of one input file.
///
/// Files ending in `.csv` are parsed as comma-separated text; everything else
/// is opened as a spreadsheet and its first worksheet is used. In both cases
/// the first row holds the column headers.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<Vec<InputRow>> {
    let rows = if is_csv(path) {
        read_csv(path)?
    } else {
        read_spreadsheet(path)?
    };
    debug!(row_count = rows.len(), "report rows loaded");
    Ok(rows)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn read_csv(path: &Path) -> Result<Vec<InputRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Row 1 is the header. Blank lines are skipped by the reader.
        let row_number = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(index + 2);
        let symbol = record.get(columns.symbol).unwrap_or_default();
        let name = record.get(columns.name).unwrap_or_default();
        let value = record.get(columns.total_value).unwrap_or_default();
        if symbol.is_empty() && name.is_empty() && value.is_empty() {
            continue;
        }
        rows.push(InputRow::new(symbol, name, parse_value(value, row_number)?));
    }

    Ok(rows)
}

fn read_spreadsheet(path: &Path) -> Result<Vec<InputRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ToolError::EmptyWorkbook)??;

    let headers: Vec<String> = match range.rows().next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };
    let columns = ColumnIndex::resolve(&headers)?;

    let first_row_number = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = Vec::new();
    for (index, row) in range.rows().enumerate().skip(1) {
        let row_number = first_row_number + index;
        let symbol = cell_to_string(row.get(columns.symbol));
        let name = cell_to_string(row.get(columns.name));
        let value_cell = row.get(columns.total_value);
        if symbol.is_empty() && name.is_empty() && is_blank(value_cell) {
            continue;
        }
        let total_value = cell_to_value(value_cell, row_number)?;
        rows.push(InputRow::new(symbol, name, total_value));
    }

    Ok(rows)
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    symbol: usize,
    name: usize,
    total_value: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let position = |wanted: &str| headers.iter().position(|header| header.trim() == wanted);

        match (
            position(SYMBOL_COLUMN),
            position(NAME_COLUMN),
            position(TOTAL_VALUE_COLUMN),
        ) {
            (Some(symbol), Some(name), Some(total_value)) => Ok(Self {
                symbol,
                name,
                total_value,
            }),
            (symbol, name, total_value) => {
                let columns = [
                    (symbol, SYMBOL_COLUMN),
                    (name, NAME_COLUMN),
                    (total_value, TOTAL_VALUE_COLUMN),
                ]
                .into_iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, column)| column.to_string())
                .collect();
                Err(ToolError::MissingColumns { columns })
            }
        }
    }
}

fn parse_value(text: &str, row: usize) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ToolError::InvalidValue {
            row,
            column: TOTAL_VALUE_COLUMN.to_string(),
            value: text.to_string(),
        }),
    }
}

fn cell_to_value(cell: Option<&DataType>, row: usize) -> Result<f64> {
    match cell {
        Some(DataType::Float(value)) => Ok(*value),
        Some(DataType::Int(value)) => Ok(*value as f64),
        Some(DataType::String(value)) => parse_value(value, row),
        Some(DataType::Empty) | None => Ok(0.0),
        Some(other) => Err(ToolError::InvalidValue {
            row,
            column: TOTAL_VALUE_COLUMN.to_string(),
            value: other.to_string(),
        }),
    }
}

fn is_blank(cell: Option<&DataType>) -> bool {
    match cell {
        Some(DataType::Empty) | None => true,
        Some(DataType::String(value)) => value.trim().is_empty(),
        Some(_) => false,
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.trim().to_string(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn required_columns_resolve_in_any_order() {
        let columns = ColumnIndex::resolve(&headers(&[
            "Total Value",
            "Exchange",
            " Security Name ",
            "Security Symbol",
        ]))
        .expect("columns resolved");

        assert_eq!(
            columns,
            ColumnIndex {
                symbol: 3,
                name: 2,
                total_value: 0,
            }
        );
    }

    #[test]
    fn every_missing_column_is_reported() {
        let error = ColumnIndex::resolve(&headers(&["Security Symbol", "Price"]))
            .expect_err("columns missing");

        match error {
            ToolError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["Security Name", "Total Value"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_values_read_as_zero_and_garbage_is_rejected() {
        assert_eq!(parse_value("  ", 2).expect("blank"), 0.0);
        assert_eq!(parse_value("1250.75", 2).expect("number"), 1250.75);
        assert!(matches!(
            parse_value("n/a", 7),
            Err(ToolError::InvalidValue { row: 7, .. })
        ));
        assert!(parse_value("inf", 3).is_err());
    }
}
