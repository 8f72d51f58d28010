use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::Level;
use std::io::Write;

use crate::utils::config::THREAD_NAME_PREFIX;

/// Terminal colors for CLI output.
pub struct Colors;

impl Colors {
    pub const STAGE: &'static str = "cyan";
    pub const ITEMS: &'static str = "green";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color)
    }
}

/// Stage or worker tag for a pipeline thread: `sigchain-multi_hash` -> `multi_hash`,
/// `sigchain-worker-3` -> `worker-3`. None for threads the pipeline did not name.
pub fn thread_tag(thread_name: Option<&str>) -> Option<&str> {
    thread_name?
        .strip_prefix(THREAD_NAME_PREFIX)?
        .strip_prefix('-')
        .filter(|tag| !tag.is_empty())
}

/// Log lines carry the emitting stage or worker, e.g. `[sigchain combine] combining 3 results`.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // try_init: tests and embedders may have installed a logger already.
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let current = std::thread::current();
            let origin = match thread_tag(current.name()) {
                Some(tag) => format!("{} {}", env!("CARGO_PKG_NAME").cyan(), tag.magenta()),
                None => env!("CARGO_PKG_NAME").cyan().to_string(),
            };
            let line = match record.level() {
                Level::Error => format!("[{} {}] {}", origin, "ERROR".red(), record.args()),
                Level::Warn => format!("[{} {}] {}", origin, "WARN".yellow(), record.args()),
                _ => format!("[{}] {}", origin, record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
