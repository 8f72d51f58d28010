//! Hash providers: the fast (parallel-safe) and slow (single-flight) primitives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use xxhash_rust::xxh3::xxh3_64;

use crate::Opts;
use crate::error::PipelineError;

/// A pure string hash. Implementations must be deterministic.
///
/// Whether a provider may be called concurrently is a property of the provider, not of this
/// trait: slow providers are only ever reached through [`SlowHashGate`](super::SlowHashGate).
pub trait HashProvider: Send + Sync {
    fn name(&self) -> &str;
    fn hash(&self, data: &str) -> Result<String, PipelineError>;
}

/// xxh3-64 of the UTF-8 bytes as an unsigned decimal string.
pub fn xxh3_digest(data: &str) -> String {
    xxh3_64(data.as_bytes()).to_string()
}

/// Blake3 digest as lowercase hex.
pub fn blake3_digest(data: &str) -> String {
    blake3::hash(data.as_bytes()).to_hex().to_string()
}

fn simulate_latency(delay: Option<Duration>) {
    if let Some(d) = delay {
        std::thread::sleep(d);
    }
}

/// Default fast provider. Safe for unbounded concurrent use.
#[derive(Debug, Default)]
pub struct Xxh3Hasher {
    delay: Option<Duration>,
}

impl Xxh3Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Option<Duration>) -> Self {
        Self { delay }
    }
}

impl HashProvider for Xxh3Hasher {
    fn name(&self) -> &str {
        "xxh3"
    }

    fn hash(&self, data: &str) -> Result<String, PipelineError> {
        simulate_latency(self.delay);
        Ok(xxh3_digest(data))
    }
}

/// Default slow provider. Serves one caller at a time: a call that arrives while another is
/// in flight fails with an `overheat` provider failure.
#[derive(Debug, Default)]
pub struct Blake3Hasher {
    delay: Option<Duration>,
    busy: AtomicBool,
}

impl Blake3Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Option<Duration>) -> Self {
        Self {
            delay,
            busy: AtomicBool::new(false),
        }
    }
}

impl HashProvider for Blake3Hasher {
    fn name(&self) -> &str {
        "blake3"
    }

    fn hash(&self, data: &str) -> Result<String, PipelineError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(PipelineError::provider(self.name(), "overheat"));
        }
        simulate_latency(self.delay);
        let digest = blake3_digest(data);
        self.busy.store(false, Ordering::Release);
        Ok(digest)
    }
}

/// The fast/slow provider pair a batch runs with.
#[derive(Clone)]
pub struct Providers {
    pub fast: Arc<dyn HashProvider>,
    pub slow: Arc<dyn HashProvider>,
}

impl Providers {
    pub fn new(fast: Arc<dyn HashProvider>, slow: Arc<dyn HashProvider>) -> Self {
        Self { fast, slow }
    }

    /// xxh3 + blake3 with the simulated latencies from `opts`.
    pub fn defaults(opts: &Opts) -> Self {
        Self::new(
            Arc::new(Xxh3Hasher::with_delay(opts.fast_delay)),
            Arc::new(Blake3Hasher::with_delay(opts.slow_delay)),
        )
    }
}
