use crate::Framework;

pub const UNDETECTED_LANGUAGE: &str = "Could not detect language.";
pub const NO_TESTS_GENERATED: &str = "No test cases generated.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSubmission {
    pub code: String,
    pub framework: Framework,
}

impl SourceSubmission {
    pub fn new(code: impl Into<String>, framework: Framework) -> Self {
        Self {
            code: code.into(),
            framework,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// Latest reply from the service. Replaced wholesale on every generation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationResult {
    pub detected_language: String,
    pub generated_tests: String,
}

impl GenerationResult {
    pub fn new(detected_language: impl Into<String>, generated_tests: impl Into<String>) -> Self {
        Self {
            detected_language: detected_language.into(),
            generated_tests: generated_tests.into(),
        }
    }

    /// Both fields must be present for a reply to count; otherwise both
    /// sentinels are shown.
    pub fn from_reply(detected_language: Option<String>, generated_tests: Option<String>) -> Self {
        let language = detected_language.filter(|v| !v.is_empty());
        let tests = generated_tests.filter(|v| !v.is_empty());
        match (language, tests) {
            (Some(language), Some(tests)) => Self::new(language, tests),
            _ => Self::new(UNDETECTED_LANGUAGE, NO_TESTS_GENERATED),
        }
    }

    pub fn has_tests(&self) -> bool {
        !self.generated_tests.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackNote {
    pub feedback: String,
}

impl FeedbackNote {
    pub fn is_blank(&self) -> bool {
        self.feedback.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestState {
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
}

impl RequestState {
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Marks a request as in flight for as long as it lives. Dropping it clears
/// `loading` on every exit path.
pub(crate) struct InFlight<'a> {
    state: &'a mut RequestState,
}

impl<'a> InFlight<'a> {
    pub(crate) fn begin(state: &'a mut RequestState) -> Self {
        state.loading = true;
        state.error = None;
        Self { state }
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.state.error = Some(message);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
    }
}
