use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, consolidates, or emits report data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the delimited-text reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("spreadsheet read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when a file name does not carry a `YYYYMMDD` report date once the
    /// marker token has been removed.
    #[error("cannot derive report date from file name '{name}': '{cleaned}' is not a YYYYMMDD date")]
    DateFormat { name: String, cleaned: String },

    /// Raised when a report lacks one or more of the required columns.
    #[error("missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// Raised when a workbook has no worksheet to read from.
    #[error("workbook contains no worksheets")]
    EmptyWorkbook,

    /// Raised when a value cell cannot be read as a number.
    #[error("invalid value '{value}' in column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Raised when processing one input file of a batch fails. The batch is
    /// aborted and the offending path is reported alongside the cause.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<ToolError>,
    },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when input files are given without a destination for the table.
    #[error("an output path is required when input files are given")]
    MissingOutput,

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Coarse classification of a [`ToolError`], used by callers that need to
/// tell a bad file name from a bad file body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file name did not decode to a report date.
    DateFormat,
    /// Required columns were absent.
    Schema,
    /// The file was unreadable, corrupt, or held a malformed value.
    Parse,
    /// Output or environment failures unrelated to a particular input.
    Io,
}

impl ToolError {
    /// Wraps an error with the input path it was raised for.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ToolError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Classifies the error, looking through [`ToolError::File`] wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            // An unreadable input is a parse failure of that input.
            ToolError::File { source, .. } => match source.kind() {
                ErrorKind::Io => ErrorKind::Parse,
                other => other,
            },
            ToolError::DateFormat { .. } => ErrorKind::DateFormat,
            ToolError::MissingColumns { .. } => ErrorKind::Schema,
            ToolError::Csv(_)
            | ToolError::ExcelRead(_)
            | ToolError::EmptyWorkbook
            | ToolError::InvalidValue { .. }
            | ToolError::MissingInput(_) => ErrorKind::Parse,
            ToolError::Io(_)
            | ToolError::Json(_)
            | ToolError::ExcelWrite(_)
            | ToolError::MissingOutput
            | ToolError::Logging(_) => ErrorKind::Io,
        }
    }

    /// Path of the input file the error was raised for, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ToolError::File { path, .. } => Some(path),
            ToolError::MissingInput(path) => Some(path),
            _ => None,
        }
    }
}
