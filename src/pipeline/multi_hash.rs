//! Multi-fingerprint: six indexed fast hashes of each string, concatenated in index order.

use crossbeam_channel::{Receiver, Sender};
use rayon::prelude::*;
use std::sync::Arc;

use super::context::PipelineContext;
use super::stage::{Stage, expect_text, fan_out};
use crate::Item;
use crate::error::PipelineError;
use crate::utils::config::MultiHashConsts;

pub const MULTI_HASH: &str = "multi_hash";

#[derive(Debug, Default)]
pub struct MultiHash;

/// `fast("0"+s) + fast("1"+s) + ... + fast("5"+s)`.
///
/// Sub-hashes complete in any order; the indexed collect keeps them in index order.
pub fn multi_fingerprint(data: &str, ctx: &PipelineContext) -> Result<String, PipelineError> {
    let parts = (0..MultiHashConsts::FAN_OUT)
        .into_par_iter()
        .map(|i| ctx.fast_hash(&format!("{i}{data}")))
        .collect::<Result<Vec<String>, PipelineError>>()?;
    Ok(parts.concat())
}

fn multi_hash_item(item: Item, ctx: &PipelineContext) -> Result<String, PipelineError> {
    let data = expect_text(MULTI_HASH, item)?;
    multi_fingerprint(&data, ctx)
}

impl Stage for MultiHash {
    fn name(&self) -> &'static str {
        MULTI_HASH
    }

    fn run(&self, input: Receiver<Item>, output: Sender<Item>, ctx: &Arc<PipelineContext>) {
        fan_out(MULTI_HASH, input, output, ctx, multi_hash_item);
    }
}
