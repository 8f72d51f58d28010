//! Engine module: hash providers, the slow-hash gate, cancellation, and the CLI surface.

pub mod arg_parser;
pub mod cancel;
pub mod cli;
pub mod core;
pub mod gate;
pub mod hashing;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cancel::CancelToken;
pub use cli::{handle_run, parse_items};
pub use core::sign_with_opts;
pub use gate::SlowHashGate;
pub use hashing::{
    Blake3Hasher, HashProvider, Providers, Xxh3Hasher, blake3_digest, xxh3_digest,
};
