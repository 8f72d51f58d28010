//! Sigchain: concurrent signing pipeline with a serialized slow-hash gate.
//!
//! A batch of integers flows through three stages over unbounded queues:
//! per-item fingerprint `fast(x) ~ fast(slow(x))`, six indexed fast hashes per fingerprint,
//! and a sorted `_`-join of everything. The result depends only on the set of inputs,
//! never on scheduling.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{CancelToken, HashProvider, Providers, SlowHashGate};
pub use error::PipelineError;

use log::debug;
use std::sync::Arc;

/// Result alias used by public sigchain API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Sign `items` with the default providers (xxh3 fast, blake3 slow).
///
/// Returns `Ok(None)` for an empty batch. The gate is private to this call; use
/// [`sign_batch_with`] to share one gate across batches or to inject providers.
pub fn sign_batch(items: &[i64], opts: &SignOpts) -> Result<Option<String>> {
    let full = Opts::from(opts);
    let providers = Providers::defaults(&full);
    let gate = SlowHashGate::new(providers.slow).with_timeout(full.gate_timeout);
    sign_batch_with(items, opts, providers.fast, &gate, &CancelToken::new())
}

/// Sign `items` with an injected fast provider and slow-hash gate.
///
/// Only `opts.num_threads` applies here: delays belong to the injected providers and the
/// acquisition timeout to `gate`.
///
/// `cancel` aborts the batch from another thread; the call then fails with
/// [`PipelineError::Cancelled`]. Any per-item failure cancels the rest of the batch and is
/// returned as the single error (downcast to [`PipelineError`] for the variant).
///
/// ```ignore
/// let gate = sigchain::SlowHashGate::new(Arc::new(MySigner));
/// let out = sigchain::sign_batch_with(&[0, 1], &Default::default(), fast, &gate, &CancelToken::new())?;
/// ```
pub fn sign_batch_with(
    items: &[i64],
    opts: &SignOpts,
    fast: Arc<dyn HashProvider>,
    gate: &SlowHashGate,
    cancel: &CancelToken,
) -> Result<Option<String>> {
    let opts = Opts::from(opts);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    engine::sign_with_opts(items, &opts, fast, gate, cancel)
}
