//! Aggregator: full barrier that sorts every incoming string and joins them with `_`.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;

use super::context::PipelineContext;
use super::stage::{Stage, expect_text};
use crate::error::PipelineError;
use crate::utils::config::JOIN_SEPARATOR;
use crate::{Item, Phase};

pub const COMBINE: &str = "combine";

#[derive(Debug, Default)]
pub struct Combine;

/// Sort lexicographically (byte order) and join. `None` for an empty set.
pub fn combine_sorted(mut parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        return None;
    }
    parts.sort_unstable();
    Some(parts.join(JOIN_SEPARATOR))
}

fn collect_text(input: &Receiver<Item>) -> Result<Vec<String>, PipelineError> {
    let mut parts = Vec::new();
    // Keep draining after a mismatch so upstream senders never see a dropped receiver mid-batch.
    let mut mismatch = None;
    while let Ok(item) = input.recv() {
        match expect_text(COMBINE, item) {
            Ok(s) => parts.push(s),
            Err(err) => {
                mismatch.get_or_insert(err);
            }
        }
    }
    match mismatch {
        Some(err) => Err(err),
        None => Ok(parts),
    }
}

impl Stage for Combine {
    fn name(&self) -> &'static str {
        COMBINE
    }

    /// Emits exactly one string, or nothing for an empty or failed batch.
    fn run(&self, input: Receiver<Item>, output: Sender<Item>, ctx: &Arc<PipelineContext>) {
        let parts = match collect_text(&input) {
            Ok(parts) => parts,
            Err(err) => {
                ctx.fail(err);
                return;
            }
        };
        ctx.set_phase(Phase::Aggregating);
        if ctx.is_cancelled() {
            debug!("{}: batch cancelled, dropping {} partial results", COMBINE, parts.len());
            return;
        }
        debug!("{}: combining {} results", COMBINE, parts.len());
        if let Some(joined) = combine_sorted(parts) {
            let _ = output.send(Item::Text(joined));
        }
    }
}
