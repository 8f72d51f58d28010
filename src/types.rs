//! Public and internal types for the sigchain API and pipeline.

use std::fmt;
use std::time::Duration;

/// A value flowing through the pipeline. Batches enter as integers; every stage after the
/// first works on text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Int(i64),
    Text(String),
}

impl Item {
    /// Short name of the representation, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Item::Int(_) => "int",
            Item::Text(_) => "text",
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Item::Text(s) => Some(s),
            Item::Int(_) => None,
        }
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Item::Int(n)
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Text(s)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Int(n) => write!(f, "{n}"),
            Item::Text(s) => f.write_str(s),
        }
    }
}

/// Lifecycle of one pipeline run.
///
/// `Draining` starts once the source queue is closed; `Aggregating` once the last barrier
/// stage has seen its input close. `Done` is set only after every stage thread has joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    NotStarted = 0,
    Running = 1,
    Draining = 2,
    Aggregating = 3,
    Done = 4,
}

impl Phase {
    pub(crate) fn from_u8(v: u8) -> Phase {
        match v {
            1 => Phase::Running,
            2 => Phase::Draining,
            3 => Phase::Aggregating,
            4 => Phase::Done,
            _ => Phase::NotStarted,
        }
    }
}

/// Lib-only options for [`sign_batch`](crate::sign_batch).
#[derive(Clone, Debug, Default)]
pub struct SignOpts {
    /// Worker pool size for per-item tasks. When None, derived from rayon's thread count.
    pub num_threads: Option<usize>,
    /// Give up waiting for the slow-hash gate after this long. None waits forever.
    pub gate_timeout: Option<Duration>,
    /// Simulated latency added to every fast-hash call of the default provider.
    pub fast_delay: Option<Duration>,
    /// Simulated latency added to every slow-hash call of the default provider.
    pub slow_delay: Option<Duration>,
}

impl From<&SignOpts> for Opts {
    fn from(o: &SignOpts) -> Self {
        Opts {
            num_threads: o.num_threads,
            gate_timeout: o.gate_timeout,
            fast_delay: o.fast_delay,
            slow_delay: o.slow_delay,
            verbose: false,
        }
    }
}

/// Full options (CLI and lib). Use [`SignOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Worker pool size for per-item tasks. When None, derived from rayon's thread count.
    pub num_threads: Option<usize>,
    /// Slow-hash gate acquisition deadline.
    pub gate_timeout: Option<Duration>,
    /// Simulated fast-hash latency.
    pub fast_delay: Option<Duration>,
    /// Simulated slow-hash latency.
    pub slow_delay: Option<Duration>,
    /// Debug logging.
    pub verbose: bool,
}
