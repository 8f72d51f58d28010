//! CLI command handler: merge config file and flags, read items, sign, print.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::Read;
use std::time::Duration;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::core::sign_with_opts;
use crate::engine::{CancelToken, Providers, SlowHashGate};
use crate::error::PipelineError;
use crate::utils::{Colors, setup_logging};
use crate::utils::sigchain_toml::{apply_file_to_opts, load_sigchain_toml};

/// Defaults, then `.sigchain.toml` in the working directory, then CLI flags.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    if let Ok(cwd) = std::env::current_dir()
        && let Some(file) = load_sigchain_toml(&cwd)
    {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_cli_to_opts(cli, &mut opts);
    setup_logging(opts.verbose);
    opts
}

pub(crate) fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if cli.threads.is_some() {
        opts.num_threads = cli.threads;
    }
    if let Some(ms) = cli.gate_timeout_ms {
        opts.gate_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = cli.fast_delay_ms {
        opts.fast_delay = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = cli.slow_delay_ms {
        opts.slow_delay = Some(Duration::from_millis(ms));
    }
}

/// Parse decimal integer tokens. The first bad token fails the whole batch before anything runs.
pub fn parse_items<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<i64>, PipelineError> {
    tokens
        .iter()
        .map(|t| {
            let t = t.as_ref();
            t.parse::<i64>()
                .map_err(|e| PipelineError::Config(format!("item {t:?} is not an integer: {e}")))
        })
        .collect()
}

fn read_items(cli: &Cli) -> Result<Vec<i64>> {
    if !cli.items.is_empty() {
        return Ok(parse_items(&cli.items)?);
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("read items from stdin")?;
    let tokens: Vec<&str> = input.split_whitespace().collect();
    Ok(parse_items(&tokens)?)
}

/// Sign the batch and print the fingerprint.
///
/// Ctrl-C replaces the default SIGINT exit and cancels the batch instead. A slow-hash call
/// already in flight cannot be interrupted: the process exits only once that call returns,
/// which with a large `--slow-delay-ms` can take a while.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    let items = read_items(cli)?;

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || on_interrupt.cancel()) {
        warn!("Ctrl-C handler not installed: {}", e);
    }

    let providers = Providers::defaults(&opts);
    let gate = SlowHashGate::new(providers.slow).with_timeout(opts.gate_timeout);
    debug!(
        "{} {}",
        Colors::colorize(Colors::STAGE, "signing"),
        Colors::colorize(Colors::ITEMS, &format!("{} items", items.len()))
    );
    match sign_with_opts(&items, &opts, providers.fast, &gate, &cancel)? {
        Some(fingerprint) => println!("{fingerprint}"),
        None => info!("Empty batch, nothing to sign."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_items_accepts_negatives() {
        assert_eq!(parse_items(&["0", "-7", "42"]).unwrap(), vec![0, -7, 42]);
    }

    #[test]
    fn test_parse_items_rejects_non_integer() {
        let err = parse_items(&["1", "two"]).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ref m) if m.contains("\"two\"")));
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let cli = Cli::parse_from(["sigchain", "1", "2", "-t", "6", "--gate-timeout-ms", "50", "-v"]);
        assert_eq!(cli.items, vec!["1".to_string(), "2".to_string()]);
        let mut opts = Opts {
            num_threads: Some(2),
            ..Default::default()
        };
        apply_cli_to_opts(&cli, &mut opts);
        assert_eq!(opts.num_threads, Some(6));
        assert_eq!(opts.gate_timeout, Some(Duration::from_millis(50)));
        assert!(opts.verbose);
        assert_eq!(opts.slow_delay, None);
    }
}
