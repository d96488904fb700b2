use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::luna::tools::error::Result;
use crate::luna::tools::model::MasterTable;

/// Name of the worksheet holding the consolidated table.
pub const CONSOLIDATED_SHEET: &str = "Consolidated";

/// Writes the consolidated table to an `.xlsx` workbook at the given path.
///
/// Identity cells are written as strings and values as numbers so the sheet
/// stays usable for further calculation.
pub fn write_table(path: &Path, table: &MasterTable) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let worksheet = workbook_writer.add_worksheet();
    worksheet.set_name(CONSOLIDATED_SHEET)?;

    let header = table.header();
    for (col_idx, title) in header.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, title)?;
    }

    let dates: Vec<_> = table.dates().copied().collect();
    for (row_idx, row) in table.rows().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        worksheet.write_string(sheet_row, 0, row.symbol)?;
        worksheet.write_string(sheet_row, 1, row.name)?;
        for (date_idx, date) in dates.iter().enumerate() {
            let value = row.value(date).unwrap_or(0.0);
            worksheet.write_number(sheet_row, (date_idx + 2) as u16, value)?;
        }
    }

    if !table.is_empty() {
        let mut excel_table = rust_xlsxwriter::Table::new();
        excel_table.set_autofilter(true);
        let col_end = (header.len() as u16).saturating_sub(1);
        let row_end = table.len() as u32;
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }

    workbook_writer.save(path)?;
    Ok(())
}
