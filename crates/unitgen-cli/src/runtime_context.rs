use crate::ServiceArgs;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use unitgen_config::{CliOverrides, Settings, load_settings};
use unitgen_http::HttpBackend;

const LOG_ENV: &str = "UNITGEN_LOG";

pub(crate) fn resolve_settings(service: &ServiceArgs, extra: CliOverrides) -> Result<Settings> {
    let cwd = std::env::current_dir().context("failed resolving current directory")?;
    let overrides = CliOverrides {
        report_base: extra.report_base,
        report_output: extra.report_output,
        ..service.overrides()
    };
    load_settings(service.config.as_deref(), &cwd, &overrides)
}

pub(crate) fn build_backend(settings: &Settings) -> Result<HttpBackend> {
    HttpBackend::new(settings.api_url.clone(), settings.timeout)
}

/// Diagnostics go to stderr. `UNITGEN_LOG` wins over `--verbose`.
pub(crate) fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "unitgen=debug,unitgen_core=debug,unitgen_http=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolves settings, starts logging and builds the HTTP backend.
pub(crate) fn prepare(service: &ServiceArgs, extra: CliOverrides) -> Result<(Settings, HttpBackend)> {
    let settings = resolve_settings(service, extra)?;
    init_logging(settings.verbose);
    tracing::debug!(api_url = %settings.api_url, framework = %settings.framework, "resolved settings");
    let backend = build_backend(&settings)?;
    Ok((settings, backend))
}
