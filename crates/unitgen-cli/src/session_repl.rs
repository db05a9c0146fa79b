use crate::ServiceArgs;
use crate::runtime_context;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use unitgen_config::CliOverrides;
use unitgen_core::{
    Clipboard, Framework, GenerationBackend, Session, SystemClipboard, copy_to_clipboard,
    render_result, save_to_dir, save_to_path,
};

pub(crate) fn session_command(service: &ServiceArgs) -> Result<()> {
    let (settings, backend) = runtime_context::prepare(service, CliOverrides::default())?;
    let cwd = std::env::current_dir().context("failed resolving current directory")?;
    let mut session = Session::new(settings.framework);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(
        &mut session,
        &backend,
        &SystemClipboard::default(),
        &cwd,
        stdin.lock(),
        &mut stdout,
    )
}

fn print_help<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Session commands:")?;
    writeln!(out, "  <text>              append a line to the code buffer")?;
    writeln!(out, "  .load <path>        replace the code buffer with a file")?;
    writeln!(out, "  .code               show the code buffer")?;
    writeln!(out, "  .clear              empty the code buffer")?;
    writeln!(out, "  .framework [name]   show or set the framework (pytest, doctest, junit)")?;
    writeln!(out, "  .generate           generate test cases")?;
    writeln!(out, "  .feedback <text>    regenerate the tests using feedback")?;
    writeln!(out, "  .show               show the detected language and tests")?;
    writeln!(out, "  .copy               copy the tests to the clipboard")?;
    writeln!(out, "  .save [path]        save the tests (default generated_test_cases.<ext>)")?;
    writeln!(out, "  .help               show this help")?;
    writeln!(out, "  .exit               quit")?;
    Ok(())
}

enum Step {
    Continue,
    Exit,
}

/// Line-oriented session loop. Command errors are reported and the loop keeps
/// going; only I/O failures on the session streams end it.
pub(crate) fn run_session<B, C, R, W>(
    session: &mut Session,
    backend: &B,
    clipboard: &C,
    cwd: &Path,
    mut input: R,
    out: &mut W,
) -> Result<()>
where
    B: GenerationBackend + ?Sized,
    C: Clipboard + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    writeln!(
        out,
        "unitgen session (framework: {}). Paste code, then .generate. Type .help for commands.",
        session.framework()
    )?;

    loop {
        line.clear();
        write!(out, "unitgen> ")?;
        out.flush().context("failed flushing output")?;

        let bytes = input
            .read_line(&mut line)
            .context("failed reading session input")?;
        if bytes == 0 {
            break;
        }

        let entry = line.trim_end_matches(['\r', '\n']);
        // Indented lines are code, so chained calls like `  .map(f)` survive.
        if !entry.starts_with('.') {
            session.append_code_line(entry);
            continue;
        }

        match handle_command(entry.trim(), session, backend, clipboard, cwd, out) {
            Ok(Step::Continue) => {}
            Ok(Step::Exit) => break,
            Err(err) => writeln!(out, "error: {err:#}")?,
        }
    }

    Ok(())
}

fn handle_command<B, C, W>(
    input: &str,
    session: &mut Session,
    backend: &B,
    clipboard: &C,
    cwd: &Path,
    out: &mut W,
) -> Result<Step>
where
    B: GenerationBackend + ?Sized,
    C: Clipboard + ?Sized,
    W: Write,
{
    let (command, arg) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command {
        ".exit" | ".quit" => return Ok(Step::Exit),
        ".help" => print_help(out)?,
        ".load" => {
            if arg.is_empty() {
                writeln!(out, "usage: .load <path>")?;
            } else {
                let path = cwd.join(arg);
                let code = fs::read_to_string(&path)
                    .with_context(|| format!("failed reading {}", path.display()))?;
                session.set_code(code);
                writeln!(
                    out,
                    "loaded {} ({} lines)",
                    path.display(),
                    session.submission().code.lines().count()
                )?;
            }
        }
        ".code" => {
            if session.submission().is_blank() {
                writeln!(out, "(code buffer is empty)")?;
            } else {
                writeln!(out, "{}", session.submission().code.trim_end())?;
            }
        }
        ".clear" => {
            session.clear_code();
            writeln!(out, "code buffer cleared")?;
        }
        ".framework" => {
            if !arg.is_empty() {
                session.set_framework(arg.parse::<Framework>()?);
            }
            let framework = session.framework();
            writeln!(out, "framework: {}", framework.label())?;
        }
        ".generate" => {
            writeln!(out, "generating test cases...")?;
            match session.generate(backend) {
                Ok(result) => write!(out, "{}", render_result(result))?,
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }
        ".feedback" => {
            session.set_feedback(arg);
            if !arg.is_empty() {
                writeln!(out, "regenerating test cases with feedback...")?;
            }
            match session.regenerate(backend) {
                Ok(result) => write!(out, "{}", render_result(result))?,
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }
        ".show" => write!(out, "{}", render_result(session.result()))?,
        ".copy" => {
            if copy_to_clipboard(session.result(), clipboard)? {
                writeln!(out, "test cases copied to clipboard")?;
            } else {
                writeln!(out, "nothing to copy yet")?;
            }
        }
        ".save" => {
            let saved = if arg.is_empty() {
                save_to_dir(session.result(), session.framework(), cwd)?
            } else {
                let path = cwd.join(arg);
                save_to_path(session.result(), &path)?.then_some(path)
            };
            match saved {
                Some(path) => writeln!(out, "saved {}", display_path(&path, cwd).display())?,
                None => writeln!(out, "nothing to save yet")?,
            }
        }
        other => writeln!(out, "unknown command {other}; type .help")?,
    }

    Ok(Step::Continue)
}

fn display_path(path: &Path, cwd: &Path) -> PathBuf {
    path.strip_prefix(cwd)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
