//! Typed pipeline failures.
//!
//! Public entry points return `anyhow::Result`; the root cause is always a [`PipelineError`]
//! and can be recovered with `err.downcast_ref::<PipelineError>()`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{stage}: expected {expected} item, got {found}")]
    TypeMismatch {
        stage: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("hash provider {provider} failed: {reason}")]
    ProviderFailure { provider: String, reason: String },

    #[error("batch was cancelled")]
    Cancelled,

    #[error("per-item task panicked: {message}")]
    TaskPanicked { message: String },

    #[error("stage {stage} panicked")]
    StagePanicked { stage: &'static str },

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn provider(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::ProviderFailure {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn mismatch(stage: &'static str, expected: &'static str, found: &crate::Item) -> Self {
        PipelineError::TypeMismatch {
            stage,
            expected,
            found: format!("{} ({})", found.kind(), found),
        }
    }
}
