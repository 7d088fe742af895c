//! # grav-tess: Tesseroid Gravity Forward Modeling
//!
//! Computes the gravitational potential, acceleration and gradient-tensor
//! components of spherical-prism (tesseroid) mass models at arbitrary
//! points, by adaptive Gauss-Legendre quadrature.
//!
//! ## Features
//!
//! - Distance-driven adaptive subdivision for accuracy near the sources
//! - Parallel batch evaluation with Rayon (observation points axis)
//! - Closed-form sphere and prism references for validation
//!

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)] // Scientific code often has many parameters

pub mod analytical;
pub mod core;

// Re-exports
pub use crate::analytical::{Prism, Sphere};
pub use crate::core::integration::{
    tesseroid_field, tesseroid_field_adaptive, AdaptiveSettings, Glq, GlqError, GlqRules,
};
pub use crate::core::model::{
    calc_field_batch, calc_tess_model, calc_tess_model_adaptive, FieldBatch,
};
pub use crate::core::types::{
    Diagnostics, FieldComponent, GeometryError, ObservationPoint, Tesseroid,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
