//! Result output: plain text tables and JSON export.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;

/// One computed grid of field values, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResult {
    /// Name of the computed component ("gz", "gzz", ...)
    pub field: String,
    /// Observation points as (lon, lat, height) triples
    pub points: Vec<(f64, f64, f64)>,
    /// Field value per point, same order as `points`
    pub values: Vec<f64>,
}

impl GridResult {
    /// Bundle points and values; lengths must agree.
    pub fn new(field: impl Into<String>, points: Vec<(f64, f64, f64)>, values: Vec<f64>) -> Self {
        assert_eq!(
            points.len(),
            values.len(),
            "points and values must have the same length"
        );
        Self {
            field: field.into(),
            points,
            values,
        }
    }

    /// Write a 4-column text table: `lon lat height value`, one point per
    /// line, with a `#` header naming the component.
    pub fn write_table<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "# lon lat height {}", self.field)?;
        for ((lon, lat, height), value) in self.points.iter().zip(&self.values) {
            writeln!(writer, "{} {} {} {:.10e}", lon, lat, height, value)?;
        }
        Ok(())
    }

    /// Save as pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize result: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write result file: {}", e))?;
        Ok(())
    }
}
