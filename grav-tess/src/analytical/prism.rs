//! Diagonal gravity-gradient components of a right rectangular prism.
//!
//! Closed forms after Nagy et al. (2000), in a flat-Earth Cartesian frame
//! with x -> North, y -> East, z -> Down. Test oracle only: the trace
//! gxx + gyy + gzz vanishes at any exterior point (Laplace's equation),
//! which guards the kernel formulas independently of the spherical code.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core::constants::{G, SI2EOTVOS};

/// A right rectangular prism with faces parallel to the coordinate planes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prism {
    /// Southern x bound (m)
    pub x1: f64,
    /// Northern x bound (m)
    pub x2: f64,
    /// Western y bound (m)
    pub y1: f64,
    /// Eastern y bound (m)
    pub y2: f64,
    /// Top z bound (m, z down)
    pub z1: f64,
    /// Bottom z bound (m, z down)
    pub z2: f64,
    /// Density (kg/m³)
    pub density: f64,
}

impl Prism {
    /// gxx component of the gravity gradient tensor (Eötvös).
    pub fn gxx(&self, xp: f64, yp: f64, zp: f64) -> f64 {
        let scale = G * SI2EOTVOS * self.density;
        scale * self.corner_sum(xp, yp, zp, |dx, dy, dz, r| arctan2(dy * dz, dx * r))
    }

    /// gyy component of the gravity gradient tensor (Eötvös).
    pub fn gyy(&self, xp: f64, yp: f64, zp: f64) -> f64 {
        let scale = G * SI2EOTVOS * self.density;
        scale * self.corner_sum(xp, yp, zp, |dx, dy, dz, r| arctan2(dz * dx, dy * r))
    }

    /// gzz component of the gravity gradient tensor (Eötvös).
    pub fn gzz(&self, xp: f64, yp: f64, zp: f64) -> f64 {
        let scale = G * SI2EOTVOS * self.density;
        scale * self.corner_sum(xp, yp, zp, |dx, dy, dz, r| arctan2(dx * dy, dz * r))
    }

    /// Evaluate the integration-limit kernel at the eight prism corners
    /// with alternating signs, relative to the observation point.
    fn corner_sum<F>(&self, xp: f64, yp: f64, zp: f64, kernel: F) -> f64
    where
        F: Fn(f64, f64, f64, f64) -> f64,
    {
        let dx = [self.x1 - xp, self.x2 - xp];
        let dy = [self.y1 - yp, self.y2 - yp];
        let dz = [self.z1 - zp, self.z2 - zp];
        let mut res = 0.0;
        for (i, &dxi) in dx.iter().enumerate() {
            for (j, &dyj) in dy.iter().enumerate() {
                for (k, &dzk) in dz.iter().enumerate() {
                    let r = (dxi * dxi + dyj * dyj + dzk * dzk).sqrt();
                    let sign = if (i + j + k) % 2 == 0 { 1.0 } else { -1.0 };
                    res += sign * kernel(dxi, dyj, dzk, r);
                }
            }
        }
        res
    }
}

/// Variant of atan2 that keeps the result in the quadrant of a plain
/// arctangent and returns 0 for y = 0, as the corner sums require.
fn arctan2(y: f64, x: f64) -> f64 {
    if y == 0.0 {
        return 0.0;
    }
    if y > 0.0 && x < 0.0 {
        return y.atan2(x) - PI;
    }
    if y < 0.0 && x < 0.0 {
        return y.atan2(x) + PI;
    }
    y.atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn test_prism() -> Prism {
        Prism {
            x1: -100.0,
            x2: 100.0,
            y1: -160.0,
            y2: 160.0,
            z1: 100.0,
            z2: 200.0,
            density: 2670.0,
        }
    }

    #[test]
    fn test_trace_vanishes_outside() {
        let prism = test_prism();
        let points = [
            (0.0, 0.0, 0.0),
            (-130.0, 52.0, 17.0),
            (500.0, -500.0, -150.0),
            (35.0, 200.0, 300.0),
        ];
        for &(xp, yp, zp) in &points {
            let trace = prism.gxx(xp, yp, zp) + prism.gyy(xp, yp, zp) + prism.gzz(xp, yp, zp);
            assert_abs_diff_eq!(trace, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_symmetry_about_axes() {
        let prism = test_prism();
        assert_relative_eq!(
            prism.gzz(50.0, 0.0, 0.0),
            prism.gzz(-50.0, 0.0, 0.0),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            prism.gxx(0.0, 80.0, 0.0),
            prism.gxx(0.0, -80.0, 0.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_gzz_sign_above_prism() {
        // The prism lies below the point (z down), so gzz is positive
        // directly above it and decays away
        let prism = test_prism();
        let above = prism.gzz(0.0, 0.0, 0.0);
        let far = prism.gzz(0.0, 0.0, -2000.0);
        assert!(above > 0.0);
        assert!(far > 0.0);
        assert!(above > far);
    }

    #[test]
    fn test_far_field_approaches_point_mass() {
        let prism = test_prism();
        let mass = prism.density
            * (prism.x2 - prism.x1)
            * (prism.y2 - prism.y1)
            * (prism.z2 - prism.z1);
        // 10 km above, distance to center 10.15 km
        let d = 10150.0;
        let expected = 2.0 * G * mass / (d * d * d) * SI2EOTVOS;
        assert_relative_eq!(prism.gzz(0.0, 0.0, -10000.0), expected, max_relative = 2e-3);
    }
}
