//! Tesseroid forward-modeling engine.
//!
//! ## Architecture
//!
//! - `types`: core data structures (Tesseroid, ObservationPoint, FieldComponent)
//! - `constants`: physical constants and engine defaults
//! - `integration`: Gauss-Legendre quadrature, field kernels, adaptive subdivision
//! - `model`: whole-model aggregation and the per-component API
//! - `io`: tesseroid model file parsing
//! - `parallel`: portable parallel iteration (rayon or sequential)

pub mod constants;
pub mod integration;
pub mod io;
pub mod model;
pub mod parallel;
pub mod types;

// Re-exports for convenience
pub use model::{calc_field_batch, calc_tess_model, calc_tess_model_adaptive, FieldBatch};
pub use types::*;
