//! Closed-form reference solutions used for cross-validation.
//!
//! ## Module Organization
//!
//! - [`sphere`] - homogeneous sphere in spherical coordinates, all ten
//!   field components
//! - [`prism`] - right rectangular prism diagonal gradient components
//!   (flat-Earth Laplace-trace oracle)

pub mod prism;
pub mod sphere;

pub use prism::Prism;
pub use sphere::Sphere;
