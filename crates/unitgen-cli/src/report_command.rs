use crate::ServiceArgs;
use crate::runtime_context;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use unitgen_config::CliOverrides;
use unitgen_core::{collect_entries, render_report};

/// Files changed between `base` and HEAD, relative to `cwd`. Any git failure
/// yields an empty list.
pub(crate) fn changed_files(base: &str, cwd: &Path) -> Vec<String> {
    let range = format!("{base}...HEAD");
    let output = Command::new("git")
        .args(["diff", "--name-only", "--relative", &range])
        .current_dir(cwd)
        .output();

    match output {
        Ok(out) if out.status.success() => parse_name_list(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            tracing::warn!(
                %range,
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "git diff failed; no files to process"
            );
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not run git; no files to process");
            Vec::new()
        }
    }
}

fn parse_name_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub(crate) fn report_command(
    service: &ServiceArgs,
    files: Vec<String>,
    base: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let extra = CliOverrides {
        report_base: base,
        report_output: output,
        ..CliOverrides::default()
    };
    let (settings, backend) = runtime_context::prepare(service, extra)?;
    let cwd = std::env::current_dir().context("failed resolving current directory")?;

    let files = if files.is_empty() {
        changed_files(&settings.report_base, &cwd)
    } else {
        files
    };
    tracing::info!(count = files.len(), "collected files for report");

    let entries = collect_entries(&backend, &cwd, &files);
    for entry in &entries {
        eprintln!("[unitgen] processed {} ({})", entry.file, entry.framework);
    }

    let report_path = cwd.join(&settings.report_output);
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(&report_path, render_report(&entries))
        .with_context(|| format!("failed writing report {}", report_path.display()))?;
    println!("Test cases written to {}", settings.report_output.display());
    Ok(())
}
