use std::sync::atomic::{AtomicU64, Ordering};

/// A metrics-only counter that can be bumped through `&self`.
///
/// Read paths (`snapshot`, `cardinality`) only hold a shared borrow, and under
/// [`SharedRanking`](crate::ranking::SharedRanking) several readers may hold
/// the read lock at once, so the counter is a relaxed atomic.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(AtomicU64);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_cell_counts_and_resets() {
        let cell = MetricsCell::new();
        cell.incr();
        cell.incr();
        assert_eq!(cell.get(), 2);
        cell.reset();
        assert_eq!(cell.get(), 0);
    }
}
