use crate::Framework;
use crate::wire::{GenerateReply, GenerateRequest, GenerationBackend};
use std::fs;
use std::path::Path;

pub const UNKNOWN_LANGUAGE: &str = "Unknown";
pub const FAILED_TO_GENERATE: &str = "Failed to generate.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub file: String,
    pub framework: Framework,
    pub language: String,
    pub tests: String,
}

/// Framework used for a changed file, by extension. Files that map to
/// `None` are left out of the report.
pub fn framework_for_path(path: &Path) -> Option<Framework> {
    match path.extension()?.to_str()? {
        "py" => Some(Framework::Pytest),
        "java" => Some(Framework::Junit),
        _ => None,
    }
}

pub fn build_entry<B>(backend: &B, file: &str, code: String, framework: Framework) -> ReportEntry
where
    B: GenerationBackend + ?Sized,
{
    let reply = match backend.generate_tests(&GenerateRequest { code, framework }) {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!(file, error = %format!("{err:#}"), "generation failed for report entry");
            GenerateReply::default()
        }
    };

    ReportEntry {
        file: file.to_string(),
        framework,
        language: reply
            .detected_language
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
        tests: reply
            .generated_tests
            .unwrap_or_else(|| FAILED_TO_GENERATE.to_string()),
    }
}

/// Sends every supported file under `root` to the service, in order.
pub fn collect_entries<B>(backend: &B, root: &Path, files: &[String]) -> Vec<ReportEntry>
where
    B: GenerationBackend + ?Sized,
{
    let mut entries = Vec::new();
    for file in files {
        let Some(framework) = framework_for_path(Path::new(file)) else {
            continue;
        };
        tracing::info!(file = %file, %framework, "processing changed file");

        let path = root.join(file);
        let code = fs::read_to_string(&path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "could not read changed file");
            String::new()
        });
        entries.push(build_entry(backend, file, code, framework));
    }
    entries
}

pub fn render_report(entries: &[ReportEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "### {} ({})\n**Detected Language**: {}\n\n```{}\n{}\n```\n\n",
                entry.file,
                entry.framework,
                entry.language,
                entry.framework.fence_language(),
                entry.tests
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        FAILED_TO_GENERATE, ReportEntry, UNKNOWN_LANGUAGE, collect_entries, framework_for_path,
        render_report,
    };
    use crate::Framework;
    use crate::wire::{
        GenerateReply, GenerateRequest, GenerationBackend, RegenerateReply, RegenerateRequest,
    };
    use anyhow::{Result, anyhow};
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[derive(Default)]
    struct EchoBackend {
        seen: RefCell<Vec<GenerateRequest>>,
    }

    impl GenerationBackend for EchoBackend {
        fn generate_tests(&self, req: &GenerateRequest) -> Result<GenerateReply> {
            self.seen.borrow_mut().push(req.clone());
            if req.code.contains("explode") {
                return Err(anyhow!("HTTP 500"));
            }
            Ok(GenerateReply {
                detected_language: Some("Python".to_string()),
                generated_tests: Some(format!("# tests for {}", req.code.trim())),
                error: None,
            })
        }

        fn regenerate_with_feedback(&self, _req: &RegenerateRequest) -> Result<RegenerateReply> {
            Err(anyhow!("not used"))
        }
    }

    #[test]
    fn maps_extensions_to_frameworks() {
        assert_eq!(framework_for_path(Path::new("src/a.py")), Some(Framework::Pytest));
        assert_eq!(framework_for_path(Path::new("A.java")), Some(Framework::Junit));
        assert_eq!(framework_for_path(Path::new("README.md")), None);
        assert_eq!(framework_for_path(Path::new("Makefile")), None);
    }

    #[test]
    fn collects_supported_files_and_survives_failures() {
        let dir = tempdir().expect("tempdir should work");
        fs::write(dir.path().join("ok.py"), "x = 1").expect("write should work");
        fs::write(dir.path().join("bad.py"), "explode()").expect("write should work");
        fs::write(dir.path().join("notes.md"), "# notes").expect("write should work");

        let backend = EchoBackend::default();
        let files = vec![
            "ok.py".to_string(),
            "notes.md".to_string(),
            "bad.py".to_string(),
            "missing.java".to_string(),
        ];
        let entries = collect_entries(&backend, dir.path(), &files);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].tests, "# tests for x = 1");
        assert_eq!(entries[1].language, UNKNOWN_LANGUAGE);
        assert_eq!(entries[1].tests, FAILED_TO_GENERATE);
        assert_eq!(entries[2].framework, Framework::Junit);

        let seen = backend.seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].code, "");
    }

    #[test]
    fn renders_markdown_with_fence_per_framework() {
        let entries = vec![
            ReportEntry {
                file: "calc.py".to_string(),
                framework: Framework::Pytest,
                language: "Python".to_string(),
                tests: "def test_add(): assert add(1, 2) == 3".to_string(),
            },
            ReportEntry {
                file: "Calc.java".to_string(),
                framework: Framework::Junit,
                language: "Java".to_string(),
                tests: "@Test void add() {}".to_string(),
            },
        ];
        let report = render_report(&entries);
        assert_eq!(
            report,
            "### calc.py (pytest)\n**Detected Language**: Python\n\n```python\ndef test_add(): assert add(1, 2) == 3\n```\n\n\
### Calc.java (junit)\n**Detected Language**: Java\n\n```java\n@Test void add() {}\n```\n\n"
        );
    }
}
