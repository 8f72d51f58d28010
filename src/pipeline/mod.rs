//! Pipeline components: context, stage contract, executor, and the signing stages.

pub mod combine;
pub mod context;
pub mod multi_hash;
pub mod orchestrator;
pub mod single_hash;
pub mod stage;

pub use combine::{Combine, combine_sorted};
pub use context::{FirstError, PipelineContext};
pub use multi_hash::{MultiHash, multi_fingerprint};
pub use orchestrator::{
    PipelineHandles, execute_pipeline, shutdown_pipeline_handles, start_pipeline,
};
pub use single_hash::{SingleHash, fingerprint};
pub use stage::{Stage, expect_text, fan_out};

/// The signing chain: per-item fingerprint, multi-fingerprint, sorted aggregate.
pub fn signing_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(SingleHash),
        Box::new(MultiHash),
        Box::new(Combine),
    ]
}
