//! County-level health access analysis rendered as a PDF report.
//!
//! The pipeline reads a county CSV ([`dataset`]), derives access metrics
//! ([`metrics`]), draws the charts ([`charts`]) and renders the assembled
//! report ([`report`]) through `genpdf`.

pub mod builder;
pub mod charts;
pub mod dataset;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod metrics;
pub mod model;
pub mod report;
pub mod richtext;
pub mod stats;
pub mod summary;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use error::{ReportError, Result};
