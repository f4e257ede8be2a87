use crate::counter::InsertCounter;
use crate::error::Error;
use crate::skewed_latest::SkewedLatestSampler;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Generator configuration.
///
/// `skew` controls how strongly draws concentrate on the newest records;
/// prior deployments disagree on a canonical value, so it is surfaced
/// here rather than baked into the sampler. The default of 0.99 gives a
/// moderate recency bias.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_skew")]
    pub skew: f64,
    /// Records loaded before the run begins; seeds the insert counter.
    #[serde(default)]
    pub initial_records: u64,
}

fn default_skew() -> f64 {
    0.99
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            skew: default_skew(),
            initial_records: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Wire up a counter/sampler pair. The counter handle is shared:
    /// hand clones to the insertion path, the sampler keeps one.
    pub fn build(&self) -> Result<(Arc<InsertCounter>, SkewedLatestSampler), Error> {
        let counter = Arc::new(InsertCounter::new(self.initial_records));
        let sampler = SkewedLatestSampler::new(Arc::clone(&counter), self.skew)?;
        Ok((counter, sampler))
    }
}
