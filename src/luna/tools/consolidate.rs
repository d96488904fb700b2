use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::luna::tools::date::{self, DEFAULT_MARKER};
use crate::luna::tools::error::Result;
use crate::luna::tools::io;
use crate::luna::tools::model::{InputRow, MasterTable, ReportDate};
use crate::luna::tools::reconcile;

/// Knobs of a consolidation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidateOptions {
    /// Token removed from file names before the date is parsed.
    pub marker: String,
}

impl Default for ConsolidateOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Outcome of a consolidation run.
#[derive(Debug, Clone, PartialEq)]
pub enum Consolidation {
    /// No input files were supplied; nothing was read or written.
    NoInput,
    /// Every input was folded into the table.
    Completed(ConsolidationReport),
}

/// Finalized table together with run diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidationReport {
    pub table: MasterTable,
    pub files_processed: usize,
    /// Distinct report dates, ascending.
    pub dates: Vec<ReportDate>,
}

impl ConsolidationReport {
    pub fn summary(&self, output: Option<&Path>) -> ConsolidationSummary {
        ConsolidationSummary {
            files_processed: self.files_processed,
            dates: self.dates.clone(),
            securities: self.table.len(),
            output: output.map(Path::to_path_buf),
        }
    }
}

/// Serializable digest of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidationSummary {
    pub files_processed: usize,
    pub dates: Vec<ReportDate>,
    pub securities: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Consolidates the given reports, in order, into one table.
///
/// The first file that cannot be loaded or dated aborts the whole run; the
/// returned [`ToolError::File`](crate::ToolError::File) names the path and wraps the cause.
#[instrument(level = "info", skip_all, fields(file_count = paths.len(), marker = %options.marker))]
pub fn consolidate<P: AsRef<Path>>(
    paths: &[P],
    options: &ConsolidateOptions,
) -> Result<Consolidation> {
    if paths.is_empty() {
        info!("no input files supplied");
        return Ok(Consolidation::NoInput);
    }

    let mut master = MasterTable::new();
    let mut dates = BTreeSet::new();

    for path in paths {
        let path = path.as_ref();
        let (rows, report_date) =
            load_report(path, &options.marker).map_err(|err| err.in_file(path))?;
        debug!(path = %path.display(), %report_date, row_count = rows.len(), "report loaded");
        dates.insert(report_date);
        master = reconcile::merge(master, &rows, report_date);
    }

    let table = reconcile::finalize(master);
    info!(
        files = paths.len(),
        dates = dates.len(),
        securities = table.len(),
        "consolidation complete"
    );

    Ok(Consolidation::Completed(ConsolidationReport {
        table,
        files_processed: paths.len(),
        dates: dates.into_iter().collect(),
    }))
}

/// Consolidates the given reports and writes the table to `output`.
///
/// Nothing is written when there is no input or when any report fails.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn consolidate_to_file<P: AsRef<Path>>(
    paths: &[P],
    output: &Path,
    options: &ConsolidateOptions,
) -> Result<Consolidation> {
    let outcome = consolidate(paths, options)?;
    if let Consolidation::Completed(report) = &outcome {
        io::write_table(output, &report.table)?;
        info!(rows = report.table.len(), "consolidated table written");
    }
    Ok(outcome)
}

fn load_report(path: &Path, marker: &str) -> Result<(Vec<InputRow>, ReportDate)> {
    let rows = io::load_table(path)?;
    let report_date = date::report_date_for_path(path, marker)?;
    Ok((rows, report_date))
}
