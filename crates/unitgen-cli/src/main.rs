mod dispatch;
mod generate_command;
mod report_command;
mod runtime_context;
mod session_repl;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use unitgen_config::CliOverrides;
use unitgen_core::Framework;

#[derive(Debug, Parser)]
#[command(name = "unitgen", version, about = "Generate unit test cases from source code")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags shared by every command that talks to the generation service.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ServiceArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, short = 'f', value_parser = parse_framework)]
    framework: Option<Framework>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl ServiceArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_url: self.api_url.clone(),
            framework: self.framework,
            timeout_secs: self.timeout_secs,
            verbose: self.verbose.then_some(true),
            ..CliOverrides::default()
        }
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Generate test cases for a file (or stdin).
    Generate {
        /// Source file; reads stdin when omitted or `-`.
        file: Option<PathBuf>,
        /// Revise the generated tests with this feedback.
        #[arg(long)]
        feedback: Option<String>,
        /// Write the tests to this path.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Save as generated_test_cases.<ext> in the current directory.
        #[arg(long)]
        save: bool,
        /// Copy the tests to the system clipboard.
        #[arg(long)]
        copy: bool,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Start an interactive generation session.
    Session {
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Generate tests for files changed on this branch and write a Markdown report.
    Report {
        /// Files to process instead of the git diff.
        #[arg(value_name = "FILE")]
        files: Vec<String>,
        /// Git base to diff against.
        #[arg(long)]
        base: Option<String>,
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        service: ServiceArgs,
    },
}

fn parse_framework(input: &str) -> Result<Framework, String> {
    input.parse().map_err(|err| format!("{err}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dispatch::execute(cli)
}
