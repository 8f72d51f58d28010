//! Core batch signing: build the context, run the signing chain, unwrap the single result.

use anyhow::Result;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

use super::cancel::CancelToken;
use super::gate::SlowHashGate;
use super::hashing::HashProvider;
use crate::pipeline::{PipelineContext, execute_pipeline, signing_stages};
use crate::{Item, Opts};

/// Sign `items` with the full signing chain. `Ok(None)` for an empty batch.
///
/// `gate` may be shared with other batches; the slow hash stays single-flight across all of them.
pub fn sign_with_opts(
    items: &[i64],
    opts: &Opts,
    fast: Arc<dyn HashProvider>,
    gate: &SlowHashGate,
    cancel: &CancelToken,
) -> Result<Option<String>> {
    let start = Instant::now();
    let ctx = Arc::new(PipelineContext::new(
        fast,
        gate.clone(),
        cancel.clone(),
        opts.num_threads,
    )?);

    let source = items.iter().copied().map(Item::Int);
    let results = execute_pipeline(signing_stages(), source, &ctx)?;
    debug!(
        "signed {} items in {:?} (slow provider: {})",
        items.len(),
        start.elapsed(),
        gate.provider_name()
    );

    Ok(results.into_iter().next().and_then(Item::into_text))
}
