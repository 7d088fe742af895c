//! Gauss-Legendre quadrature node and weight generation.
//!
//! Nodes are the roots of the Legendre polynomial P_N, found by Newton's
//! method with deflation against previously found roots. An N-point rule
//! integrates polynomials up to degree 2N-1 exactly.

use std::f64::consts::PI;
use thiserror::Error;

use crate::core::constants::{GLQ_MAX_ERROR, GLQ_MAX_ITERATIONS};
use grav_common::GlqOrders;

/// Errors from quadrature rule construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GlqError {
    /// At least two nodes are needed for a Gauss-Legendre rule
    #[error("invalid GLQ order {0}: must be >= 2")]
    InvalidOrder(usize),
}

/// A one-dimensional Gauss-Legendre rule of fixed order.
///
/// The unscaled nodes on [-1, 1] are computed once and preserved;
/// [`Glq::scale_to`] maps a working copy onto an arbitrary interval, so one
/// rule is reused across many elements by cheap O(N) rescaling. The sin/cos
/// caches serve the latitude direction, where the field kernels reuse the
/// same trigonometric values across every longitude/radius node.
#[derive(Debug, Clone)]
pub struct Glq {
    order: usize,
    nodes_unscaled: Vec<f64>,
    nodes: Vec<f64>,
    weights: Vec<f64>,
    nodes_sin: Vec<f64>,
    nodes_cos: Vec<f64>,
    converged: bool,
}

impl Glq {
    /// Build a rule of the given order with nodes on [-1, 1].
    ///
    /// Root-finder stagnation within the iteration budget is a soft failure:
    /// the best available roots are kept, a warning is logged once and
    /// [`Glq::root_finder_converged`] reports `false`. Callers may proceed.
    pub fn new(order: usize) -> Result<Self, GlqError> {
        if order < 2 {
            return Err(GlqError::InvalidOrder(order));
        }
        let mut nodes = vec![0.0; order];
        let mut converged = true;
        for i in 0..order {
            let initial =
                (PI * (order as f64 - i as f64 - 0.25) / (order as f64 + 0.5)).cos();
            if !next_root(initial, i, order, &mut nodes) {
                converged = false;
            }
        }
        if !converged {
            log::warn!(
                "Legendre root finder for order {} hit the {}-iteration budget; \
                 nodes may not reach {:e} accuracy",
                order,
                GLQ_MAX_ITERATIONS,
                GLQ_MAX_ERROR
            );
        }
        let weights = nodes
            .iter()
            .map(|&xi| {
                let pn_line = legendre_derivative(order, xi);
                2.0 / ((1.0 - xi * xi) * pn_line * pn_line)
            })
            .collect();
        Ok(Self {
            order,
            nodes: nodes.clone(),
            nodes_unscaled: nodes,
            weights,
            nodes_sin: vec![0.0; order],
            nodes_cos: vec![0.0; order],
            converged,
        })
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Nodes scaled to the interval of the last [`Glq::scale_to`] call
    /// (initially [-1, 1]).
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// The preserved, unscaled nodes on [-1, 1], in ascending order.
    pub fn nodes_unscaled(&self) -> &[f64] {
        &self.nodes_unscaled
    }

    /// Quadrature weights, matching the node order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sines of the scaled nodes, filled by [`Glq::precompute_sincos`].
    pub fn nodes_sin(&self) -> &[f64] {
        &self.nodes_sin
    }

    /// Cosines of the scaled nodes, filled by [`Glq::precompute_sincos`].
    pub fn nodes_cos(&self) -> &[f64] {
        &self.nodes_cos
    }

    /// False when the root finder exhausted its iteration budget during
    /// construction and the nodes may fall short of full accuracy.
    pub fn root_finder_converged(&self) -> bool {
        self.converged
    }

    /// Rescale the working nodes in place to `[lower, upper]`, from the
    /// preserved unscaled nodes.
    pub fn scale_to(&mut self, lower: f64, upper: f64) {
        let half_sum = 0.5 * (upper + lower);
        let half_diff = 0.5 * (upper - lower);
        for (node, &x) in self.nodes.iter_mut().zip(&self.nodes_unscaled) {
            *node = half_diff * x + half_sum;
        }
    }

    /// Cache sin/cos of the scaled nodes, which are in degrees.
    pub fn precompute_sincos(&mut self) {
        let d2r = PI / 180.0;
        for i in 0..self.order {
            let (sin, cos) = (d2r * self.nodes[i]).sin_cos();
            self.nodes_sin[i] = sin;
            self.nodes_cos[i] = cos;
        }
    }

    /// Integrate `f` over `[lower, upper]`. Rescales the working nodes.
    pub fn integrate<F: Fn(f64) -> f64>(&mut self, f: F, lower: f64, upper: f64) -> f64 {
        self.scale_to(lower, upper);
        let sum: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum();
        sum * 0.5 * (upper - lower)
    }
}

/// The three rules of one tesseroid integration (longitude, latitude,
/// radius). `Clone` so each parallel worker owns its own rescaled copies.
#[derive(Debug, Clone)]
pub struct GlqRules {
    /// Longitude rule
    pub lon: Glq,
    /// Latitude rule
    pub lat: Glq,
    /// Radius rule
    pub r: Glq,
}

impl GlqRules {
    /// Build the three rules with per-direction orders.
    pub fn new(orders: GlqOrders) -> Result<Self, GlqError> {
        Ok(Self {
            lon: Glq::new(orders.lon)?,
            lat: Glq::new(orders.lat)?,
            r: Glq::new(orders.r)?,
        })
    }

    /// Build the three rules with the same order in every direction.
    pub fn with_order(order: usize) -> Result<Self, GlqError> {
        Self::new(GlqOrders {
            lon: order,
            lat: order,
            r: order,
        })
    }

    /// Number of rules whose root finder did not converge.
    pub fn root_finder_warnings(&self) -> usize {
        [&self.lon, &self.lat, &self.r]
            .iter()
            .filter(|glq| !glq.root_finder_converged())
            .count()
    }
}

/// P_order(x) and P_{order-1}(x) by the three-term recurrence
/// `Pn(x) = ((2n-1) x Pn-1(x) - (n-1) Pn-2(x)) / n`.
fn legendre_pair(order: usize, x: f64) -> (f64, f64) {
    let mut pn_1 = 1.0; // P0
    let mut pn = x; // P1
    for n in 2..=order {
        let nf = n as f64;
        let pn_2 = pn_1;
        pn_1 = pn;
        pn = ((2.0 * nf - 1.0) * x * pn_1 - (nf - 1.0) * pn_2) / nf;
    }
    (pn, pn_1)
}

/// P'_order(x) via `Pn'(x) = n (x Pn(x) - Pn-1(x)) / (x² - 1)`.
fn legendre_derivative(order: usize, x: f64) -> f64 {
    let (pn, pn_1) = legendre_pair(order, x);
    order as f64 * (x * pn - pn_1) / (x * x - 1.0)
}

/// Newton iteration for the root at `index`, deflated against the roots
/// already stored in `roots[..index]` so it cannot re-converge onto one of
/// them. Returns false if the iteration budget ran out; the best estimate is
/// stored either way.
fn next_root(initial: f64, index: usize, order: usize, roots: &mut [f64]) -> bool {
    let mut x1 = initial;
    for _ in 0..GLQ_MAX_ITERATIONS {
        let x0 = x1;
        let (pn, pn_1) = legendre_pair(order, x0);
        let pn_line = order as f64 * (x0 * pn - pn_1) / (x0 * x0 - 1.0);
        let deflation: f64 = roots[..index].iter().map(|&root| 1.0 / (x0 - root)).sum();
        x1 = x0 - pn / (pn_line - pn * deflation);
        if (x1 - x0).abs() <= GLQ_MAX_ERROR {
            roots[index] = x1;
            return true;
        }
    }
    roots[index] = x1;
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_order_below_two_is_rejected() {
        assert_eq!(Glq::new(0).unwrap_err(), GlqError::InvalidOrder(0));
        assert_eq!(Glq::new(1).unwrap_err(), GlqError::InvalidOrder(1));
        assert!(Glq::new(2).is_ok());
    }

    #[test]
    fn test_order_2_closed_form() {
        // x = +-1/sqrt(3), w = 1
        let glq = Glq::new(2).unwrap();
        let x = 1.0 / 3.0_f64.sqrt();
        assert_abs_diff_eq!(glq.nodes_unscaled()[0], -x, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.nodes_unscaled()[1], x, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.weights()[0], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.weights()[1], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_order_3_closed_form() {
        // x = {-sqrt(3/5), 0, sqrt(3/5)}, w = {5/9, 8/9, 5/9}
        let glq = Glq::new(3).unwrap();
        let x = (3.0_f64 / 5.0).sqrt();
        assert_abs_diff_eq!(glq.nodes_unscaled()[0], -x, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.nodes_unscaled()[1], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.nodes_unscaled()[2], x, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.weights()[0], 5.0 / 9.0, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.weights()[1], 8.0 / 9.0, epsilon = 1e-15);
        assert_abs_diff_eq!(glq.weights()[2], 5.0 / 9.0, epsilon = 1e-15);
    }

    #[test]
    fn test_order_4_published_table() {
        let glq = Glq::new(4).unwrap();
        let expected_nodes = [
            -0.8611363115940526,
            -0.3399810435848563,
            0.3399810435848563,
            0.8611363115940526,
        ];
        let expected_weights = [
            0.3478548451374538,
            0.6521451548625461,
            0.6521451548625461,
            0.3478548451374538,
        ];
        for i in 0..4 {
            assert_abs_diff_eq!(glq.nodes_unscaled()[i], expected_nodes[i], epsilon = 1e-15);
            assert_abs_diff_eq!(glq.weights()[i], expected_weights[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_order_5_published_table() {
        let glq = Glq::new(5).unwrap();
        let expected_nodes = [
            -0.9061798459386640,
            -0.5384693101056831,
            0.0,
            0.5384693101056831,
            0.9061798459386640,
        ];
        let expected_weights = [
            0.2369268850561891,
            0.4786286704993665,
            0.5688888888888889,
            0.4786286704993665,
            0.2369268850561891,
        ];
        for i in 0..5 {
            assert_abs_diff_eq!(glq.nodes_unscaled()[i], expected_nodes[i], epsilon = 1e-15);
            assert_abs_diff_eq!(glq.weights()[i], expected_weights[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_order_19_rule() {
        // No compact closed form; check the structural properties and
        // polynomial exactness up to degree 2*19-1 = 37 instead.
        let mut glq = Glq::new(19).unwrap();
        assert!(glq.root_finder_converged());
        assert_abs_diff_eq!(glq.weights().iter().sum::<f64>(), 2.0, epsilon = 1e-13);
        // Nodes ascending and antisymmetric about the middle node at zero
        for i in 1..19 {
            assert!(glq.nodes_unscaled()[i] > glq.nodes_unscaled()[i - 1]);
        }
        assert_abs_diff_eq!(glq.nodes_unscaled()[9], 0.0, epsilon = 1e-15);
        for i in 0..9 {
            assert_abs_diff_eq!(
                glq.nodes_unscaled()[i],
                -glq.nodes_unscaled()[18 - i],
                epsilon = 1e-14
            );
        }
        // Exact for x^36 (degree 36 <= 37): integral over [-1,1] is 2/37
        let integral = glq.integrate(|x| x.powi(36), -1.0, 1.0);
        assert_relative_eq!(integral, 2.0 / 37.0, max_relative = 1e-10);
        // Odd powers vanish by symmetry
        let odd = glq.integrate(|x| x.powi(37), -1.0, 1.0);
        assert_abs_diff_eq!(odd, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weights_sum_to_two() {
        for order in 2..=25 {
            let glq = Glq::new(order).unwrap();
            assert_abs_diff_eq!(
                glq.weights().iter().sum::<f64>(),
                2.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_integrate_cosine() {
        // int cos = sin(b) - sin(a); wider angle ranges need higher orders
        let cases = [
            (2, 0.1 * PI),
            (3, PI),
            (5, 1.2 * PI),
            (8, 1.9 * PI),
            (15, 4.3 * PI),
            (25, 6.9 * PI),
        ];
        for &(order, angle) in &cases {
            let mut glq = Glq::new(order).unwrap();
            let result = glq.integrate(f64::cos, 0.0, angle);
            assert_abs_diff_eq!(result, angle.sin(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rescale_round_trip() {
        let mut glq = Glq::new(7).unwrap();
        let original = glq.nodes_unscaled().to_vec();
        let (a, b) = (35.2, 112.7);
        glq.scale_to(a, b);
        for (scaled, &x) in glq.nodes().iter().zip(&original) {
            // Linear inverse of the rescale map recovers the unscaled node
            let back = (2.0 * scaled - (b + a)) / (b - a);
            assert_abs_diff_eq!(back, x, epsilon = 1e-14);
        }
        // The unscaled nodes were preserved for reuse at another interval
        assert_eq!(glq.nodes_unscaled(), original.as_slice());
        glq.scale_to(-1.0, 1.0);
        for (&node, &x) in glq.nodes().iter().zip(&original) {
            assert_abs_diff_eq!(node, x, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_precompute_sincos() {
        let mut glq = Glq::new(4).unwrap();
        glq.scale_to(-10.0, 30.0);
        glq.precompute_sincos();
        let d2r = PI / 180.0;
        for i in 0..4 {
            assert_abs_diff_eq!(glq.nodes_sin()[i], (d2r * glq.nodes()[i]).sin(), epsilon = 1e-15);
            assert_abs_diff_eq!(glq.nodes_cos()[i], (d2r * glq.nodes()[i]).cos(), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_rules_bundle() {
        let rules = GlqRules::new(GlqOrders { lon: 2, lat: 3, r: 4 }).unwrap();
        assert_eq!(rules.lon.order(), 2);
        assert_eq!(rules.lat.order(), 3);
        assert_eq!(rules.r.order(), 4);
        assert_eq!(rules.root_finder_warnings(), 0);
        assert!(GlqRules::with_order(1).is_err());
    }
}
