use super::{Cli, Commands, ServiceArgs};
use crate::generate_command::{GenerateOptions, generate_command};
use crate::report_command::report_command;
use crate::session_repl::session_command;
use anyhow::Result;

pub(crate) fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Generate {
            file,
            feedback,
            output,
            save,
            copy,
            service,
        }) => generate_command(
            &service,
            GenerateOptions {
                file,
                feedback,
                output,
                save,
                copy,
            },
        ),
        Some(Commands::Session { service }) => session_command(&service),
        Some(Commands::Report {
            files,
            base,
            output,
            service,
        }) => report_command(&service, files, base, output),
        None => session_command(&ServiceArgs::default()),
    }
}
