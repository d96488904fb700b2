pub mod consolidate;
pub mod date;
pub mod error;
pub mod io;
pub mod model;
pub mod reconcile;
pub mod render;

pub use error::{ErrorKind, Result, ToolError};
