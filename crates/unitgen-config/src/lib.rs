use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use unitgen_core::{DEFAULT_BASE_URL, Framework};

pub const CONFIG_FILE_NAME: &str = "unitgen.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub framework: Option<Framework>,
    pub timeout_secs: Option<u64>,
    pub report_base: Option<String>,
    pub report_output: Option<PathBuf>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    pub api_url: Option<String>,
    pub framework: Option<Framework>,
    pub timeout_secs: Option<u64>,
    pub report_base: Option<String>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub framework: Option<Framework>,
    pub timeout_secs: Option<u64>,
    pub report_base: Option<String>,
    pub report_output: Option<PathBuf>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub framework: Framework,
    pub timeout: Option<Duration>,
    pub report_base: String,
    pub report_output: PathBuf,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            framework: Framework::Pytest,
            timeout: None,
            report_base: "origin/main".to_string(),
            report_output: PathBuf::from("generated_tests_report.md"),
            verbose: false,
        }
    }
}

pub fn load_file_config(explicit_path: Option<&Path>, cwd: &Path) -> Result<Option<FileConfig>> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                return Ok(None);
            }
            candidate
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let parsed: FileConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    Ok(Some(parsed))
}

impl EnvConfig {
    pub fn from_current_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_url: lookup("UNITGEN_API_URL").filter(|v| !v.trim().is_empty()),
            framework: lookup("UNITGEN_FRAMEWORK").and_then(|v| v.parse().ok()),
            timeout_secs: lookup("UNITGEN_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()),
            report_base: lookup("UNITGEN_REPORT_BASE").filter(|v| !v.trim().is_empty()),
            verbose: lookup("UNITGEN_VERBOSE").and_then(|v| parse_bool(&v)),
        }
    }
}

pub fn resolve_settings(
    cli: &CliOverrides,
    env_cfg: &EnvConfig,
    file_cfg: Option<&FileConfig>,
) -> Settings {
    let base = Settings::default();

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| env_cfg.api_url.clone())
        .or_else(|| file_cfg.and_then(|c| c.api_url.clone()))
        .unwrap_or(base.api_url);

    let framework = cli
        .framework
        .or(env_cfg.framework)
        .or(file_cfg.and_then(|c| c.framework))
        .unwrap_or(base.framework);

    // Zero means "no client timeout", same as leaving it unset.
    let timeout = cli
        .timeout_secs
        .or(env_cfg.timeout_secs)
        .or(file_cfg.and_then(|c| c.timeout_secs))
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .or(base.timeout);

    let report_base = cli
        .report_base
        .clone()
        .or_else(|| env_cfg.report_base.clone())
        .or_else(|| file_cfg.and_then(|c| c.report_base.clone()))
        .unwrap_or(base.report_base);

    let report_output = cli
        .report_output
        .clone()
        .or_else(|| file_cfg.and_then(|c| c.report_output.clone()))
        .unwrap_or(base.report_output);

    let verbose = cli
        .verbose
        .or(env_cfg.verbose)
        .or(file_cfg.and_then(|c| c.verbose))
        .unwrap_or(base.verbose);

    Settings {
        api_url,
        framework,
        timeout,
        report_base,
        report_output,
        verbose,
    }
}

/// Loads the config file (explicit or `unitgen.json` in `cwd`), reads the
/// environment and applies CLI overrides on top.
pub fn load_settings(config: Option<&Path>, cwd: &Path, cli: &CliOverrides) -> Result<Settings> {
    let file_cfg = load_file_config(config, cwd)?;
    let env_cfg = EnvConfig::from_current_env();
    Ok(resolve_settings(cli, &env_cfg, file_cfg.as_ref()))
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
