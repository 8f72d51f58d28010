//! Load `.sigchain.toml` from a directory (CLI only). Lib does not use this; the consuming program injects config via SignOpts.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub(crate) struct SigchainToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    num_threads: Option<usize>,
    gate_timeout_ms: Option<u64>,
    fast_delay_ms: Option<u64>,
    slow_delay_ms: Option<u64>,
    verbose: Option<bool>,
}

/// Load the config file from `dir` if present. Returns None if the file is missing or unreadable.
pub(crate) fn load_sigchain_toml(dir: &Path) -> Option<SigchainToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_sigchain_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub(crate) fn parse_sigchain_toml(s: &str) -> Result<SigchainToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Overwrite an `Option<Duration>` opts field from a millisecond value in the file.
macro_rules! apply_file_ms {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(ms) = $sec.$sec_field {
            $opts.$opts_field = Some(Duration::from_millis(ms));
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub(crate) fn apply_file_to_opts(file: &SigchainToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(n) = sec.num_threads {
        opts.num_threads = Some(n);
    }
    apply_file_ms!(sec, opts, gate_timeout_ms => gate_timeout);
    apply_file_ms!(sec, opts, fast_delay_ms => fast_delay);
    apply_file_ms!(sec, opts, slow_delay_ms => slow_delay);
    apply_file_opt!(sec, opts, verbose => verbose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_present_fields() {
        let file = parse_sigchain_toml(
            r#"
            [settings]
            num_threads = 8
            gate_timeout_ms = 250
            "#,
        )
        .unwrap();
        let mut opts = Opts {
            slow_delay: Some(Duration::from_millis(3)),
            ..Default::default()
        };
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.num_threads, Some(8));
        assert_eq!(opts.gate_timeout, Some(Duration::from_millis(250)));
        assert_eq!(opts.slow_delay, Some(Duration::from_millis(3)));
        assert_eq!(opts.fast_delay, None);
        assert!(!opts.verbose);
    }

    #[test]
    fn test_missing_settings_table_is_default() {
        let file = parse_sigchain_toml("").unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.num_threads, None);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(parse_sigchain_toml("[settings]\nnum_threads = \"many\"").is_err());
    }
}
