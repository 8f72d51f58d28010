pub mod config;
pub mod logger;
pub(crate) mod sigchain_toml;

pub use config::*;
pub use logger::{Colors, setup_logging};
