//! Error types for ratestick-view

use thiserror::Error;

/// Errors raised while building color scales, fields, and case layouts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid color format: {0:?} (expected #RRGGBB)")]
    InvalidColorFormat(String),

    #[error("invalid color scale: {0}")]
    InvalidColorScale(String),

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("invalid field bounds: x [{xmin}, {xmax}], y [{ymin}, {ymax}]")]
    InvalidBounds {
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    },

    #[error("unknown colorscale: {0}")]
    UnknownColorscale(String),

    #[error("invalid case geometry: {0}")]
    InvalidGeometry(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidGeometry(e.to_string())
    }
}

/// Result type alias for ratestick-view operations
pub type Result<T> = std::result::Result<T, Error>;
