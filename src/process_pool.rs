//! Boundary trait for the multi-process transport this crate runs
//! under. No concrete multi-process implementation lives here: callers
//! supply their own [`ProcessPool`] (MPI-backed or otherwise); this
//! crate only ever calls the three primitives below.

/// Collective operations available across the ranked peers of a
/// parallel run.
pub trait ProcessPool {
    /// Replicate `data` from `root` to every rank, returning the value
    /// every rank should now hold.
    fn broadcast(&self, data: &[f64], root: usize) -> Vec<f64>;

    /// Element-wise sum of `array` across every rank.
    fn all_sum(&self, array: &[f64]) -> Vec<f64>;

    /// Consistency check: `true` if every rank's `value` agrees with
    /// rank 0's to within a small tolerance.
    fn equality(&self, value: f64) -> bool;
}

/// Single-process [`ProcessPool`]: every collective is a no-op. Used in
/// tests and by callers that never run distributed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPool;

impl ProcessPool for NullPool {
    fn broadcast(&self, data: &[f64], _root: usize) -> Vec<f64> {
        data.to_vec()
    }

    fn all_sum(&self, array: &[f64]) -> Vec<f64> {
        array.to_vec()
    }

    fn equality(&self, _value: f64) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_pool_is_a_transparent_identity() {
        let pool = NullPool;
        assert_eq!(pool.broadcast(&[1.0, 2.0, 3.0], 0), vec![1.0, 2.0, 3.0]);
        assert_eq!(pool.all_sum(&[1.0, 2.0]), vec![1.0, 2.0]);
        assert!(pool.equality(42.0));
    }
}
