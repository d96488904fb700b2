//! File adapters: report loading and consolidated table export.

pub mod csv_write;
pub mod excel_write;
pub mod table_read;

use std::path::Path;

use crate::luna::tools::error::Result;
use crate::luna::tools::model::MasterTable;

pub use table_read::load_table;

/// Persists the table, choosing the format from the destination extension:
/// `.xlsx` produces a workbook, anything else comma-separated text.
pub fn write_table(path: &Path, table: &MasterTable) -> Result<()> {
    let is_xlsx = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);

    if is_xlsx {
        excel_write::write_table(path, table)
    } else {
        csv_write::write_table(path, table)
    }
}
