use clap::Parser;

/// Concurrent signing pipeline: order-independent fingerprint of a batch of integers.
#[derive(Clone, Debug, Parser)]
#[command(name = "sigchain")]
#[command(about = "Sign a batch of integers; reads stdin when no items are given.")]
pub struct Cli {
    /// Integers to sign. When omitted, whitespace-separated integers are read from stdin.
    #[arg(value_name = "ITEMS", allow_negative_numbers = true)]
    pub items: Vec<String>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Worker pool size for per-item tasks. Default: available parallelism (minimum 4).
    #[arg(long, short = 't', value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Give up waiting for the slow-hash gate after this many milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub gate_timeout_ms: Option<u64>,

    /// Simulated latency per fast-hash call, in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub fast_delay_ms: Option<u64>,

    /// Simulated latency per slow-hash call, in milliseconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub slow_delay_ms: Option<u64>,
}
