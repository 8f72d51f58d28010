//! Per-item fingerprint: `fast(x) ~ fast(slow(x))`.

use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

use super::context::PipelineContext;
use super::stage::{Stage, fan_out};
use crate::Item;
use crate::error::PipelineError;
use crate::utils::config::FINGERPRINT_SEPARATOR;

pub const SINGLE_HASH: &str = "single_hash";

/// First stage. Accepts integers only; the two halves of each fingerprint run concurrently,
/// and only the slow half goes through the gate.
#[derive(Debug, Default)]
pub struct SingleHash;

/// Fingerprint one decimal string.
pub fn fingerprint(data: &str, ctx: &PipelineContext) -> Result<String, PipelineError> {
    let (plain, signed) = rayon::join(
        || ctx.fast_hash(data),
        || ctx.slow_hash(data).and_then(|s| ctx.fast_hash(&s)),
    );
    Ok(format!("{}{}{}", plain?, FINGERPRINT_SEPARATOR, signed?))
}

fn single_hash_item(item: Item, ctx: &PipelineContext) -> Result<String, PipelineError> {
    match item {
        Item::Int(n) => fingerprint(&n.to_string(), ctx),
        other => Err(PipelineError::mismatch(SINGLE_HASH, "int", &other)),
    }
}

impl Stage for SingleHash {
    fn name(&self) -> &'static str {
        SINGLE_HASH
    }

    fn run(&self, input: Receiver<Item>, output: Sender<Item>, ctx: &Arc<PipelineContext>) {
        fan_out(SINGLE_HASH, input, output, ctx, single_hash_item);
    }
}
