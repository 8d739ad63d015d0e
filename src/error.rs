//! Error type shared across the report pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Anything that can go wrong between reading the input CSV and writing the
/// finished PDF.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("input is missing required column(s): {0}")]
    MissingColumns(String),

    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("failed to draw chart: {0}")]
    Chart(String),

    #[error("font setup failed: {0}")]
    Fonts(String),

    #[error("failed to assemble PDF document: {0}")]
    Pdf(#[from] genpdf::error::Error),

    #[error("markup error in report copy: {0}")]
    Markup(#[from] crate::richtext::ParseError),

    #[cfg(feature = "bookmarks")]
    #[error("failed to attach outline: {0}")]
    Outline(#[from] crate::bookmarks::OutlineError),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn chart(err: impl std::fmt::Display) -> Self {
        Self::Chart(err.to_string())
    }

    pub(crate) fn fonts(msg: impl Into<String>) -> Self {
        Self::Fonts(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
