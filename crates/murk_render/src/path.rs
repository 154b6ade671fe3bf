//! Per-path state and parallel execution of independent light paths.
//!
//! Each path owns its random stream and its medium stack. Scene objects and
//! media are shared read-only, so paths run in parallel with rayon without
//! any locking.

use crate::{MediumStack, DEFAULT_MEDIUM_DEPTH};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Maximum number of nested media on one path
    pub max_medium_depth: usize,
    /// Seed from which every path's random stream is derived
    pub base_seed: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_medium_depth: DEFAULT_MEDIUM_DEPTH,
            base_seed: 0,
        }
    }
}

/// Mutable state owned by a single light path.
pub struct PathContext<'a> {
    pub rng: StdRng,
    pub media: MediumStack<'a>,
}

impl<'a> PathContext<'a> {
    /// Fresh context for path `index`, outside of any medium.
    pub fn new(config: &TransportConfig, index: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(path_seed(config.base_seed, index)),
            media: MediumStack::new(config.max_medium_depth),
        }
    }
}

/// Seed of path `index`, decorrelated from its neighbours.
pub fn path_seed(base_seed: u64, index: u64) -> u64 {
    // splitmix64 finalizer
    let mut z = base_seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Run `trace` once for each of `count` paths in parallel.
///
/// Results come back in path order and are reproducible for a given
/// `config.base_seed`.
pub fn trace_paths<'a, T, F>(config: &TransportConfig, count: usize, trace: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &mut PathContext<'a>) -> T + Sync,
{
    log::info!(
        "Tracing {} paths (seed {}, medium depth {})",
        count,
        config.base_seed,
        config.max_medium_depth
    );

    (0..count)
        .into_par_iter()
        .map(|index| {
            let mut context = PathContext::new(config, index as u64);
            trace(index, &mut context)
        })
        .collect()
}
