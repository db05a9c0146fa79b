use crate::Framework;
use crate::model::GenerationResult;
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

pub const EXPORT_STEM: &str = "generated_test_cases";
pub const LANGUAGE_PLACEHOLDER: &str = "Language will be detected when you generate test cases.";
pub const TESTS_PLACEHOLDER: &str = "Test cases will appear here after generation.";

/// Extension for a raw wire name. Only the exact lowercase names match;
/// anything else exports as `.txt`.
pub fn extension_for(framework: &str) -> &'static str {
    Framework::ALL
        .iter()
        .find(|candidate| candidate.as_str() == framework)
        .map_or(".txt", |candidate| candidate.extension())
}

pub fn export_file_name(framework: Framework) -> String {
    format!("{EXPORT_STEM}{}", framework.extension())
}

/// Writes the tests into `dir` under the export file name. Returns `None`
/// without touching the filesystem when there is nothing to save.
pub fn save_to_dir(
    result: &GenerationResult,
    framework: Framework,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let path = dir.join(export_file_name(framework));
    Ok(save_to_path(result, &path)?.then_some(path))
}

pub fn save_to_path(result: &GenerationResult, path: &Path) -> Result<bool> {
    if !result.has_tests() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, &result.generated_tests)
        .with_context(|| format!("failed writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved generated tests");
    Ok(true)
}

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

pub fn copy_to_clipboard<C: Clipboard + ?Sized>(
    result: &GenerationResult,
    clipboard: &C,
) -> Result<bool> {
    if !result.has_tests() {
        return Ok(false);
    }
    clipboard.write_text(&result.generated_tests)?;
    Ok(true)
}

/// Plain-text view of the current result with the form's placeholders.
pub fn render_result(result: &GenerationResult) -> String {
    let language = if result.detected_language.is_empty() {
        LANGUAGE_PLACEHOLDER
    } else {
        &result.detected_language
    };
    let tests = if result.generated_tests.is_empty() {
        TESTS_PLACEHOLDER
    } else {
        &result.generated_tests
    };
    format!("Detected Language\n{language}\n\nGenerated Test Cases\n{tests}\n")
}

/// The desktop clipboard. The handle is opened on first use and kept for the
/// life of the value; on X11 and Wayland it serves the copied text.
#[derive(Default)]
pub struct SystemClipboard {
    handle: RefCell<Option<arboard::Clipboard>>,
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut slot = self.handle.borrow_mut();
        let clipboard = match slot.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("failed opening system clipboard")?,
        };
        slot.insert(clipboard)
            .set_text(text)
            .context("failed copying to clipboard")?;
        Ok(())
    }
}
