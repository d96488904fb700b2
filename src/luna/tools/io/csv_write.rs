use std::path::Path;

use crate::luna::tools::error::Result;
use crate::luna::tools::model::MasterTable;

/// Writes the consolidated table as comma-separated text.
///
/// The output depends only on the table contents, so consolidating the same
/// reports always produces the same bytes.
pub fn write_table(path: &Path, table: &MasterTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_records(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

/// Renders the consolidated table as comma-separated text in memory.
pub fn to_csv_string(table: &MasterTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_records(&mut writer, table)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_records<W: std::io::Write>(writer: &mut csv::Writer<W>, table: &MasterTable) -> Result<()> {
    writer.write_record(table.header())?;
    for record in table.records() {
        writer.write_record(&record)?;
    }
    Ok(())
}
