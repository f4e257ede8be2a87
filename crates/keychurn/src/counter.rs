use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter over inserted records.
///
/// Records are numbered 0..N-1 in insertion order. The counter stores N
/// (the population) in a single `AtomicU64`: the insertion path calls
/// [`advance`](InsertCounter::advance) once per successful insert, and the
/// sampler reads [`last`](InsertCounter::last) at the start of every draw.
/// Both sides share one instance behind an `Arc`.
pub struct InsertCounter {
    records: AtomicU64,
}

impl InsertCounter {
    /// Create a counter with `initial_records` already inserted
    /// (pre-loaded records get indices `0..initial_records`).
    pub fn new(initial_records: u64) -> Self {
        Self {
            records: AtomicU64::new(initial_records),
        }
    }

    /// Index of the most recently inserted record, or `None` if nothing
    /// has been inserted yet. Lock-free, never blocks.
    pub fn last(&self) -> Option<u64> {
        self.records.load(Ordering::Acquire).checked_sub(1)
    }

    /// Claim the next record index. Returns the index assigned to the
    /// newly inserted record; concurrent callers each get a unique,
    /// strictly increasing value.
    pub fn advance(&self) -> u64 {
        self.records.fetch_add(1, Ordering::AcqRel)
    }

    /// Number of records inserted so far.
    pub fn records(&self) -> u64 {
        self.records.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn empty_counter_has_no_last() {
        let c = InsertCounter::new(0);
        assert_eq!(c.last(), None);
        assert_eq!(c.records(), 0);
    }

    #[test]
    fn preloaded_counter_points_at_newest_record() {
        let c = InsertCounter::new(100);
        assert_eq!(c.last(), Some(99));
        assert_eq!(c.records(), 100);
    }

    #[test]
    fn advance_returns_assigned_index() {
        let c = InsertCounter::new(3);
        assert_eq!(c.advance(), 3);
        assert_eq!(c.advance(), 4);
        assert_eq!(c.last(), Some(4));
    }

    #[test]
    fn concurrent_advances_are_unique_and_gap_free() {
        const THREADS: u64 = 8;
        const PER_THREAD: u64 = 10_000;

        let counter = Arc::new(InsertCounter::new(0));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let c = Arc::clone(&counter);
                std::thread::spawn(move || {
                    (0..PER_THREAD).map(|_| c.advance()).collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            let values = h.join().unwrap();
            // Strictly increasing within one thread.
            assert!(values.windows(2).all(|w| w[0] < w[1]));
            for v in values {
                assert!(seen.insert(v), "duplicate index {v}");
            }
        }

        assert_eq!(seen.len() as u64, THREADS * PER_THREAD);
        assert_eq!(counter.last(), Some(THREADS * PER_THREAD - 1));
    }
}
