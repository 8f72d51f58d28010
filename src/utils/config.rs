//! Application configuration constants.
//! Tuning, separators, and fan-out widths in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Config file looked up in the working directory by the CLI (e.g. `.sigchain.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Worker pool ----

/// Thread limits for the per-item worker pool.
/// Use [`PoolLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct PoolLimits {
    /// Available threads (from rayon); set by [`PoolLimits::current()`].
    pub all_threads: usize,
    /// Floor: below this, one blocked gate waiter can starve fast-hash work.
    pub floor: usize,
    /// Upper bound for user overrides.
    pub max: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            max: Self::MAX_THREADS,
        }
    }
}

impl PoolLimits {
    pub const FLOOR_THREADS: usize = 4;
    pub const MAX_THREADS: usize = 256;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Effective pool size: the override (or available threads), clamped to `[floor, max]`.
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.all_threads)
            .clamp(self.floor, self.max)
    }
}

// ---- Signing ----

/// Joins the two halves of a per-item fingerprint: `fast(x) ~ fast(slow(x))`.
pub const FINGERPRINT_SEPARATOR: &str = "~";

/// Joins sorted multi-fingerprints in the final aggregate.
pub const JOIN_SEPARATOR: &str = "_";

/// Multi-fingerprint fan-out.
pub struct MultiHashConsts;

impl MultiHashConsts {
    /// Number of indexed fast hashes per item (indices `0..FAN_OUT`).
    pub const FAN_OUT: usize = 6;
}

/// Thread-name prefix for stage driver threads and pool workers.
pub const THREAD_NAME_PREFIX: &str = "sigchain";
