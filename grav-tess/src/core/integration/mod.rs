//! Numerical integration of tesseroid fields.
//!
//! ## Module Organization
//!
//! - [`glq`] - Gauss-Legendre node/weight generation and interval rescaling
//! - [`kernels`] - closed-form integrand kernels for the ten field components
//! - [`adaptive`] - distance-driven adaptive subdivision controller
//!
//! [`tesseroid_field`] in this module is the single-element integrator: a
//! 3D tensor-product quadrature of one kernel over one element.

pub mod adaptive;
pub mod glq;
pub mod kernels;

pub use adaptive::{tesseroid_field_adaptive, AdaptiveSettings};
pub use glq::{Glq, GlqError, GlqRules};
pub use kernels::NodeGeom;

use std::f64::consts::PI;

use crate::core::constants::G;
use crate::core::types::{FieldComponent, ObservationPoint, Tesseroid};

/// Field contribution of a single tesseroid at a single point, by fixed-order
/// Gauss-Legendre quadrature over the element's own bounds.
///
/// The rules are rescaled in place to the element's longitude/latitude/radius
/// extents (their unscaled nodes are preserved, so the same rules serve every
/// element). Pure apart from that buffer reuse: the result is a deterministic
/// function of element, point, component and orders.
///
/// Accuracy degrades when the element is close to the point relative to its
/// size; [`tesseroid_field_adaptive`] restores it by subdivision.
pub fn tesseroid_field(
    tess: &Tesseroid,
    point: &ObservationPoint,
    component: FieldComponent,
    rules: &mut GlqRules,
) -> f64 {
    rules.lon.scale_to(tess.w, tess.e);
    rules.lat.scale_to(tess.s, tess.n);
    rules.r.scale_to(tess.r1, tess.r2);
    rules.lat.precompute_sincos();

    let d2r = PI / 180.0;
    let rp = point.radius;
    let (sinlatp, coslatp) = (d2r * point.lat).sin_cos();

    let mut sum = 0.0;
    for (k, &lonc) in rules.lon.nodes().iter().enumerate() {
        let (sinlon, coslon) = (d2r * (lonc - point.lon)).sin_cos();
        let wlon = rules.lon.weights()[k];
        for j in 0..rules.lat.order() {
            let sinlatc = rules.lat.nodes_sin()[j];
            let coslatc = rules.lat.nodes_cos()[j];
            let cospsi = sinlatp * sinlatc + coslatp * coslatc * coslon;
            let kphi = coslatp * sinlatc - sinlatp * coslatc * coslon;
            let wlat = rules.lat.weights()[j];
            let wlonlat = wlon * wlat;
            for (i, &rc) in rules.r.nodes().iter().enumerate() {
                let wr = rules.r.weights()[i];
                let geom = NodeGeom {
                    l_sqr: rp * rp + rc * rc - 2.0 * rp * rc * cospsi,
                    kappa: rc * rc * coslatc,
                    dx: rc * kphi,
                    dy: rc * coslatc * sinlon,
                    dz: rc * cospsi - rp,
                };
                sum += wlonlat * wr * kernels::evaluate(component, &geom);
            }
        }
    }
    let scale = d2r * (tess.e - tess.w) * d2r * (tess.n - tess.s) * (tess.r2 - tess.r1) / 8.0;
    sum * G * tess.density * scale * component.unit_conversion()
}
