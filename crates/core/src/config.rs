//! Analysis configuration from defaults and environment variables

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_DEPTH: u8 = 15;
const DEFAULT_CANDIDATES: usize = 5;
const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Search depth forwarded to every evaluator query
    pub depth: u8,

    /// Number of ranked candidate moves scanned for tactical motifs
    pub candidate_count: usize,

    /// Upper bound on per-ply evaluator jobs in flight
    pub max_concurrent_queries: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            candidate_count: DEFAULT_CANDIDATES,
            max_concurrent_queries: DEFAULT_CONCURRENCY,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    /// Missing or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let depth = env::var("ANALYSIS_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEPTH);

        let candidate_count = env::var("ANALYSIS_CANDIDATES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CANDIDATES);

        let max_concurrent_queries = env::var("ANALYSIS_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CONCURRENCY);

        let config = Self {
            depth,
            candidate_count,
            max_concurrent_queries,
        }
        .clamped();

        debug!(?config, "Loaded analysis config");
        config
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_candidate_count(mut self, count: usize) -> Self {
        self.candidate_count = count.max(1);
        self
    }

    pub fn with_max_concurrent_queries(mut self, limit: usize) -> Self {
        self.max_concurrent_queries = limit.max(1);
        self
    }

    fn clamped(mut self) -> Self {
        self.candidate_count = self.candidate_count.max(1);
        self.max_concurrent_queries = self.max_concurrent_queries.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.depth, 15);
        assert_eq!(config.candidate_count, 5);
        assert_eq!(config.max_concurrent_queries, 4);
    }

    #[test]
    fn test_builders_clamp_to_one() {
        let config = AnalysisConfig::default()
            .with_candidate_count(0)
            .with_max_concurrent_queries(0)
            .with_depth(8);
        assert_eq!(config.candidate_count, 1);
        assert_eq!(config.max_concurrent_queries, 1);
        assert_eq!(config.depth, 8);
    }
}
