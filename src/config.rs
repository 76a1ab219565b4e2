//! Settings of a hybrid (multi-process, multi-thread) integration.
use crate::core::partition::PartitionStrategy;
use crate::error::Result;
use crate::integrators::midpoint::Traversal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How a worker splits its share of the work.
///
/// All fields have defaults, so `{}` is a valid JSON configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HybridConfig {
    /// Threads per worker. If `None`, the cores of the machine are shared evenly between the
    /// workers.
    pub threads: Option<usize>,
    /// How the domain is split across the workers.
    pub partition: PartitionStrategy,
    /// How the inner axes are walked.
    pub traversal: Traversal,
}

impl HybridConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration from the file at `path`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// The number of threads each of `workers` workers uses.
    pub fn threads_per_worker(&self, workers: usize) -> usize {
        self.threads
            .unwrap_or_else(|| num_cpus::get() / workers.max(1))
            .max(1)
    }
}
