//! Closed-form integrand kernels for the ten field components.
//!
//! Each kernel evaluates the unscaled contribution of a single quadrature
//! node; the integrator sums these and applies the outer scale factor and
//! unit conversion. Formulas follow Grombein, Seitz & Heck (2010), with the
//! derivatives taken in the local frame x -> North, y -> East, z -> Down.

use crate::core::types::FieldComponent;

/// Per-node geometry shared by all ten kernels.
///
/// For an observation point at radius `rp` and a quadrature node at
/// (`lonc`, `latc`, `rc`) with angular separation `psi`:
///
/// ```text
/// l_sqr = rp² + rc² - 2 rp rc cos(psi)      squared chord distance
/// kappa = rc² cos(latc)                     volume element Jacobian
/// dx    = rc (cos(latp) sin(latc) - sin(latp) cos(latc) cos(lonc - lonp))
/// dy    = rc cos(latc) sin(lonc - lonp)
/// dz    = rc cos(psi) - rp
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NodeGeom {
    /// Squared distance from the observation point to the node (m²)
    pub l_sqr: f64,
    /// Jacobian factor rc² cos(latc)
    pub kappa: f64,
    /// Local northward displacement of the node (m)
    pub dx: f64,
    /// Local eastward displacement of the node (m)
    pub dy: f64,
    /// Local upward displacement of the node (m)
    pub dz: f64,
}

/// Evaluate one kernel at one node.
///
/// Powers of the distance are built from `l_sqr * sqrt(l_sqr)` products
/// rather than `powf`, which dominates the runtime otherwise.
pub fn evaluate(component: FieldComponent, geom: &NodeGeom) -> f64 {
    let NodeGeom {
        l_sqr,
        kappa,
        dx,
        dy,
        dz,
    } = *geom;
    match component {
        FieldComponent::Pot => kappa / l_sqr.sqrt(),
        FieldComponent::Gx => kappa * dx / l_cubed(l_sqr),
        FieldComponent::Gy => kappa * dy / l_cubed(l_sqr),
        // Sign flipped so that z points down: positive gravity toward the mass
        FieldComponent::Gz => -(kappa * dz / l_cubed(l_sqr)),
        FieldComponent::Gxx => kappa * (3.0 * dx * dx - l_sqr) / l_fifth(l_sqr),
        FieldComponent::Gxy => kappa * 3.0 * dx * dy / l_fifth(l_sqr),
        FieldComponent::Gxz => kappa * 3.0 * dx * dz / l_fifth(l_sqr),
        FieldComponent::Gyy => kappa * (3.0 * dy * dy - l_sqr) / l_fifth(l_sqr),
        FieldComponent::Gyz => kappa * 3.0 * dy * dz / l_fifth(l_sqr),
        FieldComponent::Gzz => kappa * (3.0 * dz * dz - l_sqr) / l_fifth(l_sqr),
    }
}

#[inline]
fn l_cubed(l_sqr: f64) -> f64 {
    l_sqr * l_sqr.sqrt()
}

#[inline]
fn l_fifth(l_sqr: f64) -> f64 {
    l_sqr * l_sqr * l_sqr.sqrt()
}
