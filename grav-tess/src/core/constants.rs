//! Physical constants and engine defaults.
//!
//! All values are SI unless stated otherwise.

/// Mean Earth radius (m), used as the reference sphere for heights.
pub const MEAN_EARTH_RADIUS: f64 = 6_378_137.0;

/// The gravitational constant (m³ kg⁻¹ s⁻²).
pub const G: f64 = 6.673e-11;

/// Conversion factor from SI (1/s²) to Eötvös.
pub const SI2EOTVOS: f64 = 1.0e9;

/// Conversion factor from SI (m/s²) to mGal.
pub const SI2MGAL: f64 = 1.0e5;

/// Distance-size ratio for the potential in the adaptive discretization of
/// tesseroids. Higher-order derivatives decay faster and need the source
/// element kept proportionally farther away, hence the larger ratios below.
pub const POT_SIZE_RATIO: f64 = 1.0;

/// Distance-size ratio for the first derivatives (gx, gy, gz).
pub const GRAVITY_SIZE_RATIO: f64 = 1.5;

/// Distance-size ratio for the second derivatives (gxx ... gzz).
pub const GRADIENT_SIZE_RATIO: f64 = 8.0;

/// Default exponent applied to the distance in the subdivision test.
pub const DEFAULT_DISTANCE_POWER: f64 = 1.0;

/// Upper bound on buffered sub-elements during one adaptive evaluation.
/// A circuit breaker, not a tuning knob: hitting it degrades accuracy.
pub const SUBDIVISION_STACK_CAPACITY: usize = 10_000;

/// Iteration budget for the Legendre root finder.
pub const GLQ_MAX_ITERATIONS: usize = 1_000;

/// Convergence tolerance for the Legendre root finder.
pub const GLQ_MAX_ERROR: f64 = 1.0e-15;
