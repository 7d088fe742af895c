//! Regular observation grids.

use serde::{Deserialize, Serialize};

/// `num` evenly spaced values from `start` to `stop` inclusive.
pub fn lin_space(start: f64, stop: f64, num: usize) -> Vec<f64> {
    if num == 0 {
        return Vec::new();
    }
    if num == 1 {
        return vec![start];
    }
    let step = (stop - start) / (num - 1) as f64;
    (0..num).map(|i| start + step * i as f64).collect()
}

/// A regular longitude/latitude grid at constant height.
///
/// Heights are meters above the reference sphere; conversion to an absolute
/// radial coordinate happens at the caller, the grid itself is geometry only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Western edge (degrees)
    pub west: f64,
    /// Eastern edge (degrees)
    pub east: f64,
    /// Southern edge (degrees)
    pub south: f64,
    /// Northern edge (degrees)
    pub north: f64,
    /// Number of points along longitude
    #[serde(default = "default_npoints")]
    pub nlon: usize,
    /// Number of points along latitude
    #[serde(default = "default_npoints")]
    pub nlat: usize,
    /// Observation height above the reference sphere (m)
    #[serde(default)]
    pub height: f64,
}

fn default_npoints() -> usize {
    51
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            west: -5.0,
            east: 5.0,
            south: -5.0,
            north: 5.0,
            nlon: default_npoints(),
            nlat: default_npoints(),
            height: 0.0,
        }
    }
}

impl GridSpec {
    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nlon * self.nlat
    }

    /// True when the grid holds no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generate the grid as `(lon, lat, height)` triples, longitude varying
    /// fastest (row-major over latitude rows, south to north).
    pub fn points(&self) -> Vec<(f64, f64, f64)> {
        let lons = lin_space(self.west, self.east, self.nlon);
        let lats = lin_space(self.south, self.north, self.nlat);
        let mut points = Vec::with_capacity(self.len());
        for &lat in &lats {
            for &lon in &lons {
                points.push((lon, lat, self.height));
            }
        }
        points
    }
}
