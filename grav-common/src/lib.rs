//! # grav-common: shared glue for the gravity forward-modeling workspace
//!
//! Run configuration (JSON), regular observation grids and result output.
//! The computation engine itself lives in the `grav-tess` crate; this crate
//! knows nothing about tesseroids, only about where to evaluate and where
//! the numbers go.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod grid;
pub mod output;

// Re-exports
pub use config::{GlqOrders, RunConfig};
pub use grid::{lin_space, GridSpec};
pub use output::GridResult;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
