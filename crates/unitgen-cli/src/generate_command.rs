use crate::ServiceArgs;
use crate::runtime_context;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use unitgen_config::CliOverrides;
use unitgen_core::{Session, SystemClipboard, copy_to_clipboard, save_to_dir, save_to_path};

#[derive(Debug, Default)]
pub(crate) struct GenerateOptions {
    pub(crate) file: Option<PathBuf>,
    pub(crate) feedback: Option<String>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) save: bool,
    pub(crate) copy: bool,
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed reading source file {}", path.display())),
        _ => {
            let mut code = String::new();
            io::stdin()
                .read_to_string(&mut code)
                .context("failed reading source from stdin")?;
            Ok(code)
        }
    }
}

pub(crate) fn generate_command(service: &ServiceArgs, options: GenerateOptions) -> Result<()> {
    let (settings, backend) = runtime_context::prepare(service, CliOverrides::default())?;
    let code = read_source(options.file.as_deref())?;

    let mut session = Session::new(settings.framework);
    session.set_code(code);
    session.generate(&backend)?;

    if let Some(feedback) = options.feedback {
        session.set_feedback(feedback);
        session.regenerate(&backend)?;
    }

    let result = session.result();
    eprintln!("[unitgen] detected language: {}", result.detected_language);
    println!("{}", result.generated_tests);

    if let Some(path) = options.output.as_deref() {
        if save_to_path(result, path)? {
            eprintln!("[unitgen] saved {}", path.display());
        }
    }
    if options.save {
        let cwd = std::env::current_dir().context("failed resolving current directory")?;
        if let Some(path) = save_to_dir(result, session.framework(), &cwd)? {
            eprintln!("[unitgen] saved {}", path.display());
        }
    }
    if options.copy && copy_to_clipboard(result, &SystemClipboard::default())? {
        eprintln!("[unitgen] test cases copied to clipboard");
    }

    Ok(())
}
