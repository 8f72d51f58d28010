//! Stage contract and the per-item fan-out shared by the mapping stages.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;

use super::context::PipelineContext;
use crate::Item;
use crate::error::PipelineError;

/// One pipeline step.
///
/// `run` consumes `input` until it is closed, even after a cancel, and sends results on
/// `output`. The downstream queue closes once `output` and every clone of it handed to
/// spawned tasks are dropped, so `run` may return before its own tasks finish but never
/// before upstream ones.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, input: Receiver<Item>, output: Sender<Item>, ctx: &Arc<PipelineContext>);
}

/// Drive a 1:1 stage: one pool task per received item, each applying `map` and sending the
/// result. A failing item records its error and cancels the batch; nothing is sent for it.
///
/// After a cancel the driver keeps draining `input` without spawning, so it returns only once
/// every upstream sender (and with it every upstream task) is gone.
pub fn fan_out<F>(
    stage: &'static str,
    input: Receiver<Item>,
    output: Sender<Item>,
    ctx: &Arc<PipelineContext>,
    map: F,
) where
    F: Fn(Item, &PipelineContext) -> Result<String, PipelineError> + Send + Sync + 'static,
{
    let map = Arc::new(map);
    let mut spawned = 0_usize;
    let mut discarded = 0_usize;
    while let Ok(item) = input.recv() {
        if ctx.is_cancelled() {
            discarded += 1;
            continue;
        }
        spawned += 1;
        let map = Arc::clone(&map);
        let ctx_t = Arc::clone(ctx);
        let output = output.clone();
        ctx.pool().spawn(move || {
            if ctx_t.is_cancelled() {
                return;
            }
            match map(item, ctx_t.as_ref()) {
                Ok(out) => {
                    let _ = output.send(Item::Text(out));
                }
                Err(err) => ctx_t.fail(err),
            }
        });
    }
    debug!(
        "{}: input closed, {} items spawned, {} discarded after cancel",
        stage, spawned, discarded
    );
    // Dropping the stage's own sender; spawned tasks hold the remaining clones.
    drop(output);
}

/// Unwrap a text item or report a type mismatch for `stage`.
pub fn expect_text(stage: &'static str, item: Item) -> Result<String, PipelineError> {
    match item {
        Item::Text(s) => Ok(s),
        other => Err(PipelineError::mismatch(stage, "text", &other)),
    }
}
