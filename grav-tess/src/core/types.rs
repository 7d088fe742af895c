//! Core data types: volume elements, observation points, field components.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

use crate::analytical::sphere::Sphere;
use crate::core::constants::{
    GRADIENT_SIZE_RATIO, GRAVITY_SIZE_RATIO, MEAN_EARTH_RADIUS, POT_SIZE_RATIO, SI2EOTVOS, SI2MGAL,
};

/// Errors raised by geometric constraint checks on volume elements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Lower bound of an axis is not strictly below the upper bound
    #[error("inverted {axis} bounds: {lower} >= {upper}")]
    InvertedBounds {
        /// Which axis failed ("longitude", "latitude" or "radius")
        axis: &'static str,
        /// Offending lower bound
        lower: f64,
        /// Offending upper bound
        upper: f64,
    },
    /// Radii are measured from the coordinate origin and must be positive
    #[error("inner radius must be positive, got {0}")]
    NonPositiveRadius(f64),
}

/// A tesseroid: a volume element bounded by two meridians, two parallels and
/// two concentric spheres.
///
/// Angular bounds are in degrees, radial bounds in meters measured from the
/// coordinate origin (not from a reference sphere). Immutable by convention;
/// [`Tesseroid::split`] produces new independent values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tesseroid {
    /// Western longitude bound (degrees)
    pub w: f64,
    /// Eastern longitude bound (degrees)
    pub e: f64,
    /// Southern latitude bound (degrees)
    pub s: f64,
    /// Northern latitude bound (degrees)
    pub n: f64,
    /// Inner radius (m)
    pub r1: f64,
    /// Outer radius (m)
    pub r2: f64,
    /// Density (kg/m³)
    pub density: f64,
}

impl Tesseroid {
    /// Create a tesseroid, validating that all bounds are properly ordered
    /// and the inner radius is positive.
    pub fn new(
        w: f64,
        e: f64,
        s: f64,
        n: f64,
        r1: f64,
        r2: f64,
        density: f64,
    ) -> Result<Self, GeometryError> {
        if w >= e {
            return Err(GeometryError::InvertedBounds {
                axis: "longitude",
                lower: w,
                upper: e,
            });
        }
        if s >= n {
            return Err(GeometryError::InvertedBounds {
                axis: "latitude",
                lower: s,
                upper: n,
            });
        }
        if r1 >= r2 {
            return Err(GeometryError::InvertedBounds {
                axis: "radius",
                lower: r1,
                upper: r2,
            });
        }
        if r1 <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(r1));
        }
        Ok(Self {
            w,
            e,
            s,
            n,
            r1,
            r2,
            density,
        })
    }

    /// Volume in m³.
    pub fn volume(&self) -> f64 {
        let d2r = PI / 180.0;
        d2r * (self.e - self.w)
            * (self.r2.powi(3) - self.r1.powi(3))
            * ((d2r * self.n).sin() - (d2r * self.s).sin())
            / 3.0
    }

    /// Geometric center as `(lon, lat, r)` in (degrees, degrees, m).
    pub fn center(&self) -> (f64, f64, f64) {
        (
            0.5 * (self.w + self.e),
            0.5 * (self.s + self.n),
            0.5 * (self.r1 + self.r2),
        )
    }

    /// Metric extents `[lon arc, lat arc, radial thickness]` in meters.
    ///
    /// The angular arcs are great-circle distances between the face midpoints,
    /// computed with Vincenty's formula at the outer radius.
    pub fn side_lengths(&self) -> [f64; 3] {
        let d2r = PI / 180.0;
        let (sinlatc, coslatc) = (d2r * 0.5 * (self.s + self.n)).sin_cos();
        let (sindlon, cosdlon) = (d2r * (self.e - self.w)).sin_cos();
        let dlon = self.r2
            * f64::atan2(
                ((coslatc * sindlon).powi(2)
                    + (coslatc * sinlatc - sinlatc * coslatc * cosdlon).powi(2))
                .sqrt(),
                sinlatc * sinlatc + coslatc * coslatc * cosdlon,
            );
        let (sins, coss) = (d2r * self.s).sin_cos();
        let (sinn, cosn) = (d2r * self.n).sin_cos();
        let dlat = self.r2 * f64::atan2(coss * sinn - sins * cosn, sins * sinn + coss * cosn);
        [dlon, dlat, self.r2 - self.r1]
    }

    /// True when the observation point lies within the element's bounds
    /// (inclusive). Such points make the integrand singular.
    pub fn contains(&self, point: &ObservationPoint) -> bool {
        point.lon >= self.w
            && point.lon <= self.e
            && point.lat >= self.s
            && point.lat <= self.n
            && point.radius >= self.r1
            && point.radius <= self.r2
    }

    /// Split into `nlon × nlat × nr` children of equal angular/radial size
    /// and the same density. Radius varies slowest, longitude fastest.
    pub fn split(&self, nlon: usize, nlat: usize, nr: usize) -> Vec<Tesseroid> {
        let dlon = (self.e - self.w) / nlon as f64;
        let dlat = (self.n - self.s) / nlat as f64;
        let dr = (self.r2 - self.r1) / nr as f64;
        let mut children = Vec::with_capacity(nlon * nlat * nr);
        for k in 0..nr {
            let r1 = self.r1 + dr * k as f64;
            for j in 0..nlat {
                let s = self.s + dlat * j as f64;
                for i in 0..nlon {
                    let w = self.w + dlon * i as f64;
                    children.push(Tesseroid {
                        w,
                        e: w + dlon,
                        s,
                        n: s + dlat,
                        r1,
                        r2: r1 + dr,
                        density: self.density,
                    });
                }
            }
        }
        children
    }

    /// Equal-volume (hence equal-mass) sphere centered on the element.
    /// Used by the cross-validation tests.
    pub fn to_sphere(&self) -> Sphere {
        let (lon, lat, rc) = self.center();
        Sphere {
            density: self.density,
            lon,
            lat,
            rc,
            radius: (3.0 * self.volume() / (4.0 * PI)).cbrt(),
        }
    }
}

/// Total mass (kg) of a tesseroid model.
pub fn total_mass(model: &[Tesseroid]) -> f64 {
    model.iter().map(|t| t.density * t.volume()).sum()
}

/// Where a field value is evaluated, in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    /// Longitude (degrees)
    pub lon: f64,
    /// Latitude (degrees)
    pub lat: f64,
    /// Distance from the coordinate origin (m)
    pub radius: f64,
}

impl ObservationPoint {
    /// Point at an absolute radial coordinate.
    pub fn new(lon: f64, lat: f64, radius: f64) -> Self {
        Self { lon, lat, radius }
    }

    /// Point at `height` meters above the mean Earth radius reference sphere.
    pub fn from_height(lon: f64, lat: f64, height: f64) -> Self {
        Self {
            lon,
            lat,
            radius: MEAN_EARTH_RADIUS + height,
        }
    }
}

/// The gravitational field component to compute.
///
/// The local coordinate frame at the observation point is x -> North,
/// y -> East, z -> Down (so gz of a positive-density mass below the point is
/// positive, matching the geophysical convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldComponent {
    /// Gravitational potential (SI, m²/s²)
    Pot,
    /// Northward acceleration (mGal)
    Gx,
    /// Eastward acceleration (mGal)
    Gy,
    /// Downward acceleration (mGal)
    Gz,
    /// North-North gradient (Eötvös)
    Gxx,
    /// North-East gradient (Eötvös)
    Gxy,
    /// North-Down gradient (Eötvös)
    Gxz,
    /// East-East gradient (Eötvös)
    Gyy,
    /// East-Down gradient (Eötvös)
    Gyz,
    /// Down-Down gradient (Eötvös)
    Gzz,
}

impl FieldComponent {
    /// All ten components, potential first, tensor components last.
    pub const ALL: [FieldComponent; 10] = [
        FieldComponent::Pot,
        FieldComponent::Gx,
        FieldComponent::Gy,
        FieldComponent::Gz,
        FieldComponent::Gxx,
        FieldComponent::Gxy,
        FieldComponent::Gxz,
        FieldComponent::Gyy,
        FieldComponent::Gyz,
        FieldComponent::Gzz,
    ];

    /// Lowercase name, as used in model configuration files.
    pub fn name(self) -> &'static str {
        match self {
            FieldComponent::Pot => "pot",
            FieldComponent::Gx => "gx",
            FieldComponent::Gy => "gy",
            FieldComponent::Gz => "gz",
            FieldComponent::Gxx => "gxx",
            FieldComponent::Gxy => "gxy",
            FieldComponent::Gxz => "gxz",
            FieldComponent::Gyy => "gyy",
            FieldComponent::Gyz => "gyz",
            FieldComponent::Gzz => "gzz",
        }
    }

    /// Conversion factor from SI to the component's conventional output unit.
    pub fn unit_conversion(self) -> f64 {
        match self {
            FieldComponent::Pot => 1.0,
            FieldComponent::Gx | FieldComponent::Gy | FieldComponent::Gz => SI2MGAL,
            _ => SI2EOTVOS,
        }
    }

    /// Default distance-size ratio for the adaptive subdivision.
    ///
    /// Higher-order derivatives decay faster with distance, so their
    /// quadrature needs the source kept proportionally farther away.
    pub fn default_ratio(self) -> f64 {
        match self {
            FieldComponent::Pot => POT_SIZE_RATIO,
            FieldComponent::Gx | FieldComponent::Gy | FieldComponent::Gz => GRAVITY_SIZE_RATIO,
            _ => GRADIENT_SIZE_RATIO,
        }
    }
}

impl std::str::FromStr for FieldComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldComponent::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown field component '{}'", s))
    }
}

/// Non-fatal accuracy conditions accumulated during an evaluation.
///
/// Batch computation over many points must not abort on one problematic
/// point, so these are counted and surfaced instead of returned as errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Adaptive subdivisions that hit the stack capacity and integrated a
    /// too-close element as-is; the affected results may be materially wrong
    pub degraded_evaluations: usize,
    /// Observation points found inside a source element
    pub degenerate_points: usize,
    /// Quadrature rules whose root finder exhausted its iteration budget
    pub root_finder_warnings: usize,
}

impl Diagnostics {
    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Diagnostics) {
        self.degraded_evaluations += other.degraded_evaluations;
        self.degenerate_points += other.degenerate_points;
        self.root_finder_warnings += other.root_finder_warnings;
    }

    /// True when no accuracy condition was recorded.
    pub fn is_clean(&self) -> bool {
        self.degraded_evaluations == 0
            && self.degenerate_points == 0
            && self.root_finder_warnings == 0
    }
}
