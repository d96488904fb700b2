use std::path::Path;

use chrono::NaiveDate;

use crate::luna::tools::error::{Result, ToolError};
use crate::luna::tools::model::ReportDate;

/// Token report files carry in front of their date, e.g. `QUOTE20240101.csv`.
pub const DEFAULT_MARKER: &str = "QUOTE";

const DATE_PATTERN: &str = "%Y%m%d";

/// Derives the report date from a file base name (no directory, no extension).
///
/// Every occurrence of `marker` is removed, case-sensitively, and the remainder
/// must be exactly eight digits forming a valid `YYYYMMDD` calendar date. An
/// empty marker leaves the name untouched.
pub fn extract_date(file_name: &str, marker: &str) -> Result<ReportDate> {
    let cleaned = if marker.is_empty() {
        file_name.to_string()
    } else {
        file_name.replace(marker, "")
    };

    let invalid = || ToolError::DateFormat {
        name: file_name.to_string(),
        cleaned: cleaned.clone(),
    };

    if cleaned.len() != 8 || !cleaned.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(&cleaned, DATE_PATTERN).map_err(|_| invalid())
}

/// Base name of a report path: the file name up to its first `.`.
pub fn base_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}

/// Derives the report date for a file on disk.
pub fn report_date_for_path(path: &Path, marker: &str) -> Result<ReportDate> {
    extract_date(&base_name(path), marker)
}
