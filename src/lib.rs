//! Core library for the luna-tools command line application.
//!
//! The library consolidates per-date security valuation reports into a single
//! wide table. The modules keep responsibilities narrow and composable: file
//! name handling lives in [`luna::tools::date`], IO adapters under
//! [`luna::tools::io`], data representations inside [`luna::tools::model`], the
//! identity fold in [`luna::tools::reconcile`], and the batch orchestration
//! under [`luna::tools::consolidate`].

pub mod luna;

pub use luna::tools::{
    ErrorKind, Result, ToolError, consolidate, date, error, io, model, reconcile, render,
};
