use crate::Framework;
use crate::error::SubmitError;
use regex::Regex;
use std::sync::LazyLock;

static JAVA_LIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public\s+class|System\.out\.println|void\s+main").expect("java pattern is valid")
});

static PYTHON_LIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"def\s+\w+\s*\(|print\(|import\s+\w+").expect("python pattern is valid")
});

/// Best-effort language hints. The service performs the real detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageHints {
    pub java: bool,
    pub python: bool,
}

pub fn sniff(code: &str) -> LanguageHints {
    LanguageHints {
        java: JAVA_LIKELY.is_match(code),
        python: PYTHON_LIKELY.is_match(code),
    }
}

/// Rejects the two known framework/language mismatches before any request is
/// made. Only these two rules apply; every other combination passes.
pub fn check_framework(code: &str, framework: Framework) -> Result<(), SubmitError> {
    let hints = sniff(code);
    tracing::trace!(java = hints.java, python = hints.python, "language hints");

    if hints.java && framework != Framework::Junit {
        tracing::debug!(%framework, "guard rejected java-looking source");
        return Err(SubmitError::JavaRequiresJunit);
    }

    if hints.python && framework == Framework::Junit {
        tracing::debug!(%framework, "guard rejected python-looking source");
        return Err(SubmitError::PythonIncompatibleWithJunit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LanguageHints, check_framework, sniff};
    use crate::Framework;
    use crate::error::SubmitError;

    const JAVA: &str = "public class Hello {\n  public static void main(String[] a) {}\n}";
    const PYTHON: &str = "def add(a, b):\n    return a + b\n";

    #[test]
    fn sniffs_each_java_marker() {
        assert!(sniff("public   class X {}").java);
        assert!(sniff("System.out.println(1);").java);
        assert!(sniff("static void main(String[] args)").java);
        assert!(!sniff("class X {}").java);
    }

    #[test]
    fn sniffs_each_python_marker() {
        assert!(sniff("def  run (x):").python);
        assert!(sniff("print('hi')").python);
        assert!(sniff("import os").python);
        assert!(!sniff("x = 1").python);
    }

    #[test]
    fn java_needs_junit() {
        for framework in [Framework::Pytest, Framework::Doctest] {
            assert_eq!(
                check_framework(JAVA, framework),
                Err(SubmitError::JavaRequiresJunit)
            );
        }
        assert_eq!(check_framework(JAVA, Framework::Junit), Ok(()));
    }

    #[test]
    fn python_rejects_junit() {
        assert_eq!(
            check_framework(PYTHON, Framework::Junit),
            Err(SubmitError::PythonIncompatibleWithJunit)
        );
        assert_eq!(check_framework(PYTHON, Framework::Pytest), Ok(()));
        assert_eq!(check_framework(PYTHON, Framework::Doctest), Ok(()));
    }

    #[test]
    fn unrecognized_source_passes_everything() {
        let code = "fn main() { let x = 1; }";
        assert_eq!(sniff(code), LanguageHints::default());
        for framework in Framework::ALL {
            assert_eq!(check_framework(code, framework), Ok(()));
        }
    }

    #[test]
    fn both_markers_with_junit_hits_python_rule() {
        // Java rule passes for junit, so the python rule decides.
        let code = "public class A {}\nimport os";
        assert_eq!(
            check_framework(code, Framework::Junit),
            Err(SubmitError::PythonIncompatibleWithJunit)
        );
        assert_eq!(
            check_framework(code, Framework::Pytest),
            Err(SubmitError::JavaRequiresJunit)
        );
    }
}
