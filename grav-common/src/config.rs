//! JSON configuration for forward-modeling runs.

use crate::grid::GridSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete description of one forward-modeling run, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Tesseroid model file (7-column text format)
    pub model: PathBuf,
    /// Observation grid
    #[serde(default)]
    pub grid: GridSpec,
    /// Field component to compute ("pot", "gx", ..., "gzz")
    #[serde(default = "default_field")]
    pub field: String,
    /// Gauss-Legendre orders per dimension
    #[serde(default)]
    pub glq: GlqOrders,
    /// Use adaptive subdivision (recommended)
    #[serde(default = "default_adaptive")]
    pub adaptive: bool,
    /// Override for the distance-size ratio (None = per-component default)
    #[serde(default)]
    pub ratio: Option<f64>,
    /// Output path; stdout when absent. A `.json` suffix selects JSON output.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_field() -> String {
    "gz".to_string()
}

fn default_adaptive() -> bool {
    true
}

/// Gauss-Legendre quadrature orders for the three integration directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlqOrders {
    /// Longitudinal order
    #[serde(default = "default_order")]
    pub lon: usize,
    /// Latitudinal order
    #[serde(default = "default_order")]
    pub lat: usize,
    /// Radial order
    #[serde(default = "default_order")]
    pub r: usize,
}

fn default_order() -> usize {
    2
}

impl Default for GlqOrders {
    fn default() -> Self {
        Self {
            lon: default_order(),
            lat: default_order(),
            r: default_order(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: RunConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: RunConfig = serde_json::from_str(r#"{"model": "crust.txt"}"#).unwrap();
        assert_eq!(config.field, "gz");
        assert!(config.adaptive);
        assert_eq!(config.glq, GlqOrders::default());
        assert_eq!(config.ratio, None);
        assert_eq!(config.grid.nlon, 51);
    }

    #[test]
    fn test_explicit_fields() {
        let config: RunConfig = serde_json::from_str(
            r#"{
                "model": "basin.txt",
                "field": "gzz",
                "glq": {"lon": 8, "lat": 8, "r": 8},
                "adaptive": false,
                "ratio": 2.5,
                "grid": {"west": 40, "east": 50, "south": -5, "north": 5,
                         "nlon": 21, "nlat": 11, "height": 250000.0}
            }"#,
        )
        .unwrap();
        assert_eq!(config.field, "gzz");
        assert!(!config.adaptive);
        assert_eq!(config.ratio, Some(2.5));
        assert_eq!(config.glq.lon, 8);
        assert_eq!(config.grid.len(), 21 * 11);
    }
}
