//! Tesseroid model input.
//!
//! Models are plain text, one element per line, seven whitespace-separated
//! columns:
//!
//! ```text
//! W E S N TOP BOTTOM DENSITY
//! ```
//!
//! Bounds in degrees, TOP/BOTTOM in meters relative to the mean Earth
//! radius (converted to absolute radii on read), density in kg/m³. Blank
//! lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::constants::MEAN_EARTH_RADIUS;
use crate::core::types::{GeometryError, Tesseroid};

/// Errors from reading a tesseroid model file.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A line did not have exactly seven columns
    #[error("line {line}: expected 7 columns (W E S N TOP BOTTOM DENSITY), found {found}")]
    ColumnCount {
        /// 1-based line number
        line: usize,
        /// Number of columns found
        found: usize,
    },
    /// A column was not a valid number
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// The offending token
        token: String,
    },
    /// The parsed element violates a geometric invariant
    #[error("line {line}: {source}")]
    InvalidGeometry {
        /// 1-based line number
        line: usize,
        /// The violated constraint
        #[source]
        source: GeometryError,
    },
    /// The file could not be read
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a whole model from text.
pub fn parse_model(text: &str) -> Result<Vec<Tesseroid>, ModelError> {
    let mut model = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        model.push(parse_line(trimmed, line)?);
    }
    Ok(model)
}

/// Read and parse a model file.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<Vec<Tesseroid>, ModelError> {
    parse_model(&fs::read_to_string(path)?)
}

fn parse_line(line_text: &str, line: usize) -> Result<Tesseroid, ModelError> {
    let columns: Vec<&str> = line_text.split_whitespace().collect();
    if columns.len() != 7 {
        return Err(ModelError::ColumnCount {
            line,
            found: columns.len(),
        });
    }
    let mut values = [0.0; 7];
    for (value, &token) in values.iter_mut().zip(&columns) {
        *value = token.parse().map_err(|_| ModelError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    let [w, e, s, n, top, bottom, density] = values;
    Tesseroid::new(
        w,
        e,
        s,
        n,
        MEAN_EARTH_RADIUS + bottom,
        MEAN_EARTH_RADIUS + top,
        density,
    )
    .map_err(|source| ModelError::InvalidGeometry { line, source })
}
