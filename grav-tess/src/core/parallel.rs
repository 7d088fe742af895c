//! Portable parallel iteration
//!
//! Observation points are the natural parallel axis of a forward model:
//! every point evaluation is independent once each worker owns its own
//! rescaled quadrature rules. With the `native` feature this maps through
//! rayon; without it the same code runs sequentially.

/// Check if parallel processing is available
#[inline]
pub fn is_parallel_available() -> bool {
    cfg!(feature = "native")
}

/// Parallel map over a slice
///
/// When the `native` feature is enabled, uses rayon's parallel iterator.
/// Otherwise, falls back to sequential iteration.
#[cfg(feature = "native")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

#[cfg(not(feature = "native"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_map() {
        let data = vec![1, 2, 3, 4, 5];
        let result = parallel_map(&data, |x| x * 2);
        assert_eq!(result, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_parallel_map_preserves_order() {
        let data: Vec<usize> = (0..100).collect();
        let result = parallel_map(&data, |x| x + 1);
        assert!(result.windows(2).all(|w| w[1] == w[0] + 1));
    }
}
