//! Distance-driven adaptive subdivision of tesseroids.
//!
//! Fixed-order quadrature is only accurate when the element is far from the
//! observation point relative to its own extent. Instead of raising the
//! quadrature order near the source, the controller recursively halves the
//! element along whichever dimensions are too large for the current
//! distance, on an explicit bounded stack of value-typed elements.

use std::f64::consts::PI;

use crate::core::constants::{DEFAULT_DISTANCE_POWER, SUBDIVISION_STACK_CAPACITY};
use crate::core::integration::{tesseroid_field, GlqRules};
use crate::core::types::{Diagnostics, FieldComponent, ObservationPoint, Tesseroid};

/// Tuning knobs for the subdivision controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSettings {
    /// Distance-size ratio; `None` selects the component's default
    /// (see [`FieldComponent::default_ratio`])
    pub ratio: Option<f64>,
    /// Exponent applied to the distance in the subdivision test
    pub power: f64,
    /// Stack capacity; reaching it forces integration of a too-close
    /// element and degrades accuracy instead of failing
    pub stack_capacity: usize,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            ratio: None,
            power: DEFAULT_DISTANCE_POWER,
            stack_capacity: SUBDIVISION_STACK_CAPACITY,
        }
    }
}

impl AdaptiveSettings {
    /// Settings with an explicit distance-size ratio override.
    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            ratio: Some(ratio),
            ..Self::default()
        }
    }
}

/// Field contribution of one tesseroid at one point, with the element
/// recursively split until every remaining piece passes the distance test
/// `distance^power >= ratio * size` in all three dimensions.
///
/// Each split halves the marked dimensions, so sizes shrink geometrically
/// and the loop terminates for any point outside the element. Two
/// non-fatal conditions are counted in `diag` instead of aborting:
///
/// - a point inside the element's bounds would never satisfy the distance
///   test; the element is integrated whole and the result is unreliable;
/// - if pushing children would overflow the stack, the popped element is
///   integrated as-is at degraded accuracy.
pub fn tesseroid_field_adaptive(
    tess: &Tesseroid,
    point: &ObservationPoint,
    component: FieldComponent,
    rules: &mut GlqRules,
    settings: &AdaptiveSettings,
    diag: &mut Diagnostics,
) -> f64 {
    let ratio = settings.ratio.unwrap_or_else(|| component.default_ratio());
    let d2r = PI / 180.0;
    let rp = point.radius;
    let rp_sqr = rp * rp;
    let rlonp = d2r * point.lon;
    let (sinlatp, coslatp) = (d2r * point.lat).sin_cos();

    let mut stack = vec![*tess];
    let mut total = 0.0;
    while let Some(current) = stack.pop() {
        if current.contains(point) {
            // Splitting would recurse forever around the singularity
            diag.degenerate_points += 1;
            log::warn!(
                "point ({} {} {}) lies on tesseroid {:?}; cannot guarantee accuracy",
                point.lon,
                point.lat,
                point.radius,
                current
            );
            total += tesseroid_field(&current, point, component, rules);
            continue;
        }

        // Chord distance from the element's top-center to the point
        let rt = current.r2;
        let lont = d2r * 0.5 * (current.w + current.e);
        let latt = d2r * 0.5 * (current.s + current.n);
        let cospsi = sinlatp * latt.sin() + coslatp * latt.cos() * (rlonp - lont).cos();
        let distance = (rp_sqr + rt * rt - 2.0 * rp * rt * cospsi).sqrt();
        let measure = if settings.power == 1.0 {
            distance
        } else {
            distance.powf(settings.power)
        };

        let [size_lon, size_lat, size_r] = current.side_lengths();
        let nlon = if measure < ratio * size_lon { 2 } else { 1 };
        let nlat = if measure < ratio * size_lat { 2 } else { 1 };
        let nr = if measure < ratio * size_r { 2 } else { 1 };

        if nlon == 1 && nlat == 1 && nr == 1 {
            total += tesseroid_field(&current, point, component, rules);
        } else if stack.len() + nlon * nlat * nr > settings.stack_capacity {
            diag.degraded_evaluations += 1;
            log::warn!(
                "subdivision stack capacity {} reached at point ({} {} {}); \
                 integrating tesseroid without further refinement",
                settings.stack_capacity,
                point.lon,
                point.lat,
                point.radius
            );
            total += tesseroid_field(&current, point, component, rules);
        } else {
            log::debug!(
                "splitting tesseroid {:?} into ({} {} {}) for point ({} {} {}) at ratio {}",
                current,
                nlon,
                nlat,
                nr,
                point.lon,
                point.lat,
                point.radius,
                ratio
            );
            stack.extend(current.split(nlon, nlat, nr));
        }
    }
    total
}
