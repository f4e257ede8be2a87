//! Recency-skewed key-popularity generation for benchmark workloads.
//!
//! A workload driver inserts records numbered 0..N-1 and needs to pick
//! which record each simulated read/update targets. This crate picks
//! those indices so that recently inserted records are disproportionately
//! hot, following a Zipfian law re-anchored to the newest record on every
//! draw — the "read latest" access pattern of feeds, timelines, and
//! sensor stores.
//!
//! Two pieces:
//! - [`InsertCounter`]: shared atomic counter advanced by the insertion
//!   path, read by the sampler to find the current newest record.
//! - [`SkewedLatestSampler`]: per-draw inverse-CDF sampling over a
//!   memoized Zipfian mass table, with a bracket-then-refine search.
//!
//! ```
//! use keychurn::GeneratorConfig;
//!
//! let (counter, sampler) = GeneratorConfig {
//!     skew: 0.99,
//!     initial_records: 1000,
//! }
//! .build()
//! .unwrap();
//!
//! counter.advance(); // record 1000 inserted
//! let index = sampler.next().unwrap();
//! assert!(index <= 1000);
//! ```

mod config;
mod counter;
mod error;
mod skewed_latest;
mod zipf;

pub use config::GeneratorConfig;
pub use counter::InsertCounter;
pub use error::Error;
pub use skewed_latest::SkewedLatestSampler;
pub use zipf::ZipfRanks;
