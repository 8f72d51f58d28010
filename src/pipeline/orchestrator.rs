use anyhow::Result;
use crossbeam_channel::{Receiver, unbounded};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::context::PipelineContext;
use super::stage::Stage;
use crate::error::PipelineError;
use crate::utils::config::THREAD_NAME_PREFIX;
use crate::{Item, Phase};

/// Driver threads and the final queue returned by [`start_pipeline`].
/// Caller drains `output_rx`, then joins with [`shutdown_pipeline_handles`].
pub struct PipelineHandles {
    pub output_rx: Receiver<Item>,
    pub stage_handles: Vec<(&'static str, JoinHandle<()>)>,
}

/// Wire `stages` in order (output of stage i is the input of stage i+1) over unbounded queues,
/// start one driver thread per stage, and feed `source` into the first stage.
/// The source queue is closed once every source item is enqueued.
pub fn start_pipeline<I>(
    stages: Vec<Box<dyn Stage>>,
    source: I,
    ctx: &Arc<PipelineContext>,
) -> Result<PipelineHandles>
where
    I: IntoIterator<Item = Item>,
{
    ctx.set_phase(Phase::Running);
    let (source_tx, mut input) = unbounded::<Item>();
    let mut stage_handles = Vec::with_capacity(stages.len());

    for stage in stages {
        let name = stage.name();
        let (tx, rx) = unbounded::<Item>();
        let stage_input = std::mem::replace(&mut input, rx);
        let ctx_s = Arc::clone(ctx);
        let handle = thread::Builder::new()
            .name(format!("{THREAD_NAME_PREFIX}-{name}"))
            .spawn(move || {
                debug!("{}: started", name);
                stage.run(stage_input, tx, &ctx_s);
                debug!("{}: returned", name);
            })?;
        stage_handles.push((name, handle));
    }

    let mut fed = 0_usize;
    for item in source {
        if source_tx.send(item).is_err() {
            break;
        }
        fed += 1;
    }
    debug!("source: {} items enqueued", fed);
    ctx.set_phase(Phase::Draining);
    // Dropping the only source sender closes the first stage's input.
    drop(source_tx);

    Ok(PipelineHandles {
        output_rx: input,
        stage_handles,
    })
}

/// Join every stage driver. A panicked driver is recorded as [`PipelineError::StagePanicked`].
pub fn shutdown_pipeline_handles(
    stage_handles: Vec<(&'static str, JoinHandle<()>)>,
    ctx: &PipelineContext,
) {
    for (stage, h) in stage_handles {
        if h.join().is_err() {
            ctx.fail(PipelineError::StagePanicked { stage });
        }
    }
}

/// Run `stages` over `source` to completion and return everything the last stage emitted.
///
/// Blocks until the final queue is closed and every stage driver has joined. Fails with the
/// first error recorded by any stage or task; partial output is never returned on failure.
/// With no stages, nothing runs and the result is empty.
pub fn execute_pipeline<I>(
    stages: Vec<Box<dyn Stage>>,
    source: I,
    ctx: &Arc<PipelineContext>,
) -> Result<Vec<Item>>
where
    I: IntoIterator<Item = Item>,
{
    if stages.is_empty() {
        debug!("no stages, nothing to run");
        ctx.set_phase(Phase::Done);
        return Ok(Vec::new());
    }

    let PipelineHandles {
        output_rx,
        stage_handles,
    } = start_pipeline(stages, source, ctx)?;

    let mut results = Vec::new();
    while let Ok(item) = output_rx.recv() {
        results.push(item);
    }
    debug!("main: final queue closed, {} results", results.len());

    shutdown_pipeline_handles(stage_handles, ctx);
    ctx.set_phase(Phase::Done);

    ctx.outcome()?;
    Ok(results)
}
