use crate::counter::InsertCounter;
use crate::error::Error;
use crate::zipf::ZipfRanks;
use rand::Rng;
use std::sync::Arc;

/// Key-popularity generator biased toward recently inserted records.
///
/// Each draw re-reads the shared [`InsertCounter`] and samples a Zipfian
/// rank over the current population, so the distribution re-anchors to the
/// newest record as insertions happen: rank 1 maps to the newest index,
/// rank L+1 to the oldest (index 0). All draw state lives in the shared
/// mass table inside [`ZipfRanks`], so one sampler instance can be used
/// from many worker threads through a shared reference.
pub struct SkewedLatestSampler {
    counter: Arc<InsertCounter>,
    ranks: ZipfRanks,
}

impl SkewedLatestSampler {
    /// Bind a sampler to the insertion counter. Rejects non-finite or
    /// non-positive skew; performs no up-front distribution work (the
    /// mass table fills lazily on the first draw).
    pub fn new(counter: Arc<InsertCounter>, skew: f64) -> Result<Self, Error> {
        let ranks = ZipfRanks::new(skew)?;
        tracing::debug!(skew, "skewed-latest sampler created");
        Ok(Self { counter, ranks })
    }

    pub fn skew(&self) -> f64 {
        self.ranks.skew()
    }

    /// Draw the index of the record to access, using the process-wide
    /// RNG. Errors with [`Error::NoRecords`] if nothing has been
    /// inserted yet.
    pub fn next(&self) -> Result<u64, Error> {
        self.next_with(&mut rand::thread_rng())
    }

    /// Draw using a caller-supplied RNG (seed one for reproducible
    /// sequences).
    pub fn next_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<u64, Error> {
        let last = self.counter.last().ok_or(Error::NoRecords)?;
        let u: f64 = rng.gen();
        let rank = self.ranks.sample_rank(last + 1, u);
        // rank 1 -> newest record, rank last+1 -> record 0.
        Ok(last + 1 - rank)
    }

    /// Normalized probability of drawing a record `age` positions behind
    /// the newest one, at the current population. Handy for comparing
    /// empirical frequencies against the closed-form masses.
    pub fn expected_frequency(&self, age: u64) -> Result<f64, Error> {
        let last = self.counter.last().ok_or(Error::NoRecords)?;
        let population = last + 1;
        debug_assert!(age <= last);
        let rank = age + 1;
        let upper = self.ranks.cumulative(rank, population);
        let lower = if rank == 1 {
            0.0
        } else {
            self.ranks.cumulative(rank - 1, population)
        };
        Ok(upper - lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sampler(records: u64, skew: f64) -> SkewedLatestSampler {
        SkewedLatestSampler::new(Arc::new(InsertCounter::new(records)), skew).unwrap()
    }

    fn histogram(s: &SkewedLatestSampler, draws: usize, seed: u64) -> Vec<u64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let len = s.counter.records() as usize;
        let mut counts = vec![0u64; len];
        for _ in 0..draws {
            counts[s.next_with(&mut rng).unwrap() as usize] += 1;
        }
        counts
    }

    #[test]
    fn empty_domain_is_rejected() {
        let s = sampler(0, 0.99);
        assert!(matches!(s.next(), Err(Error::NoRecords)));
    }

    #[test]
    fn single_record_always_returns_zero() {
        for skew in [0.5, 0.99, 2.0, 10.0] {
            let s = sampler(1, skew);
            let mut rng = StdRng::seed_from_u64(7);
            for _ in 0..1_000 {
                assert_eq!(s.next_with(&mut rng).unwrap(), 0);
            }
        }
    }

    #[test]
    fn draws_stay_in_domain() {
        for records in [1, 2, 5, 100, 10_000] {
            let s = sampler(records, 0.99);
            let mut rng = StdRng::seed_from_u64(records);
            for _ in 0..2_000 {
                assert!(s.next_with(&mut rng).unwrap() < records);
            }
        }
    }

    #[test]
    fn newest_records_dominate() {
        // 10 records, skew 2.0: closed-form mass gives the newest record
        // ~64.5% and record 0 ~0.645%.
        let s = sampler(10, 2.0);
        let draws = 10_000;
        let counts = histogram(&s, draws, 42);

        assert!(counts[9] as f64 > 0.5 * draws as f64, "counts={counts:?}");
        assert!((counts[0] as f64) < 0.01 * draws as f64, "counts={counts:?}");
        // Monotonically decreasing with age at the hot end.
        assert!(counts[9] > counts[8]);
        assert!(counts[8] > counts[7]);
        // Adjacent-rank ratio should be near 2^skew = 4.
        let ratio = counts[9] as f64 / counts[8] as f64;
        assert!(ratio > 2.5 && ratio < 6.0, "ratio={ratio}");
    }

    #[test]
    fn empirical_matches_expected_frequency() {
        let s = sampler(10, 2.0);
        let draws = 100_000;
        let counts = histogram(&s, draws, 1);
        for age in 0..3 {
            let expected = s.expected_frequency(age).unwrap();
            let observed = counts[9 - age as usize] as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "age={age} expected={expected} observed={observed}"
            );
        }
    }

    #[test]
    fn higher_skew_concentrates_on_newest() {
        let draws = 50_000;
        let mild = histogram(&sampler(100, 0.5), draws, 99);
        let strong = histogram(&sampler(100, 2.0), draws, 99);
        assert!(strong[99] > mild[99]);
    }

    #[test]
    fn growth_reanchors_without_escaping_domain() {
        let counter = Arc::new(InsertCounter::new(1));
        let s = SkewedLatestSampler::new(Arc::clone(&counter), 0.99).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5_000 {
            let last = counter.last().unwrap();
            assert!(s.next_with(&mut rng).unwrap() <= last);
            counter.advance();
        }
    }

    #[test]
    fn concurrent_draws_and_inserts_stay_bounded() {
        let counter = Arc::new(InsertCounter::new(1));
        let s = Arc::new(SkewedLatestSampler::new(Arc::clone(&counter), 0.99).unwrap());

        let inserter = {
            let c = Arc::clone(&counter);
            std::thread::spawn(move || {
                for _ in 0..20_000 {
                    c.advance();
                }
            })
        };

        let samplers: Vec<_> = (0..4)
            .map(|_| {
                let s = Arc::clone(&s);
                let c = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..5_000 {
                        let v = s.next().unwrap();
                        // The bound may have grown since the draw started,
                        // but can never be below the drawn value.
                        assert!(v <= c.last().unwrap());
                    }
                })
            })
            .collect();

        inserter.join().unwrap();
        for h in samplers {
            h.join().unwrap();
        }
    }
}
