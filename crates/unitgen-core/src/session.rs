use crate::Framework;
use crate::error::SubmitError;
use crate::guard::check_framework;
use crate::model::{
    FeedbackNote, GenerationResult, InFlight, NO_TESTS_GENERATED, RequestState, SourceSubmission,
};
use crate::wire::{GenerateRequest, GenerationBackend, RegenerateRequest};

/// Form state for one interactive session: input, feedback, latest result and
/// request status. A failed request keeps the last good result.
#[derive(Debug, Clone, Default)]
pub struct Session {
    submission: SourceSubmission,
    feedback: FeedbackNote,
    result: GenerationResult,
    request: RequestState,
}

impl Session {
    pub fn new(framework: Framework) -> Self {
        Self {
            submission: SourceSubmission::new(String::new(), framework),
            ..Self::default()
        }
    }

    pub fn submission(&self) -> &SourceSubmission {
        &self.submission
    }

    pub fn result(&self) -> &GenerationResult {
        &self.result
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn feedback(&self) -> &str {
        &self.feedback.feedback
    }

    pub fn framework(&self) -> Framework {
        self.submission.framework
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.submission.code = code.into();
    }

    pub fn append_code_line(&mut self, line: &str) {
        self.submission.code.push_str(line);
        self.submission.code.push('\n');
    }

    pub fn clear_code(&mut self) {
        self.submission.code.clear();
    }

    pub fn set_framework(&mut self, framework: Framework) {
        self.submission.framework = framework;
    }

    pub fn set_feedback(&mut self, feedback: impl Into<String>) {
        self.feedback.feedback = feedback.into();
    }

    pub fn generate<B>(&mut self, backend: &B) -> Result<&GenerationResult, SubmitError>
    where
        B: GenerationBackend + ?Sized,
    {
        if let Err(err) = self.validate_generate() {
            self.request.error = Some(err.to_string());
            return Err(err);
        }

        let req = GenerateRequest {
            code: self.submission.code.clone(),
            framework: self.submission.framework,
        };
        tracing::debug!(framework = %req.framework, bytes = req.code.len(), "dispatching generation request");

        let reply = {
            let mut inflight = InFlight::begin(&mut self.request);
            match backend.generate_tests(&req) {
                Ok(reply) => reply,
                Err(err) => {
                    let err = transport_error(&err);
                    inflight.fail(err.to_string());
                    return Err(err);
                }
            }
        };

        if let Some(message) = reply.error.as_deref() {
            tracing::warn!(%message, "service reported an error in a success reply");
        }
        let result = GenerationResult::from_reply(reply.detected_language, reply.generated_tests);
        if result.generated_tests == NO_TESTS_GENERATED {
            tracing::debug!("generation reply incomplete; showing placeholders");
        }
        self.result = result;
        Ok(&self.result)
    }

    pub fn regenerate<B>(&mut self, backend: &B) -> Result<&GenerationResult, SubmitError>
    where
        B: GenerationBackend + ?Sized,
    {
        if let Err(err) = self.validate_regenerate() {
            self.request.error = Some(err.to_string());
            return Err(err);
        }

        let req = RegenerateRequest {
            code: self.submission.code.clone(),
            framework: self.submission.framework,
            feedback: self.feedback.feedback.clone(),
        };
        tracing::debug!(framework = %req.framework, "dispatching feedback regeneration");

        let reply = {
            let mut inflight = InFlight::begin(&mut self.request);
            match backend.regenerate_with_feedback(&req) {
                Ok(reply) => reply,
                Err(err) => {
                    let err = transport_error(&err);
                    inflight.fail(err.to_string());
                    return Err(err);
                }
            }
        };

        if let Some(message) = reply.error.as_deref() {
            tracing::warn!(%message, "service reported an error in a success reply");
        }
        self.result.generated_tests = reply
            .generated_tests
            .filter(|tests| !tests.is_empty())
            .unwrap_or_else(|| NO_TESTS_GENERATED.to_string());
        self.feedback.feedback.clear();
        Ok(&self.result)
    }

    fn validate_generate(&self) -> Result<(), SubmitError> {
        if self.submission.is_blank() {
            return Err(SubmitError::EmptyCode);
        }
        check_framework(&self.submission.code, self.submission.framework)
    }

    fn validate_regenerate(&self) -> Result<(), SubmitError> {
        if self.feedback.is_blank() {
            return Err(SubmitError::EmptyFeedback);
        }
        if self.submission.is_blank() {
            return Err(SubmitError::EmptyCode);
        }
        Ok(())
    }
}

fn transport_error(err: &anyhow::Error) -> SubmitError {
    tracing::warn!(error = %format!("{err:#}"), "request to generation service failed");
    SubmitError::Transport {
        cause: format!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::Framework;
    use crate::error::SubmitError;
    use crate::model::{NO_TESTS_GENERATED, UNDETECTED_LANGUAGE};
    use crate::wire::{
        GenerateReply, GenerateRequest, GenerationBackend, RegenerateReply, RegenerateRequest,
    };
    use anyhow::{Result, anyhow};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct StubBackend {
        fail: bool,
        reply: GenerateReply,
        regen: RegenerateReply,
        calls: Cell<usize>,
        last_regen: RefCell<Option<RegenerateRequest>>,
    }

    impl GenerationBackend for StubBackend {
        fn generate_tests(&self, _req: &GenerateRequest) -> Result<GenerateReply> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.reply.clone())
        }

        fn regenerate_with_feedback(&self, req: &RegenerateRequest) -> Result<RegenerateReply> {
            self.calls.set(self.calls.get() + 1);
            *self.last_regen.borrow_mut() = Some(req.clone());
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.regen.clone())
        }
    }

    fn python_reply() -> GenerateReply {
        GenerateReply {
            detected_language: Some("Python".to_string()),
            generated_tests: Some("def test_x(): ...".to_string()),
            error: None,
        }
    }

    fn python_session() -> Session {
        let mut session = Session::new(Framework::Pytest);
        session.set_code("def add(a, b):\n    return a + b\n");
        session
    }

    #[test]
    fn blank_code_never_dispatches() {
        let backend = StubBackend::default();
        for code in ["", "   \n\t "] {
            let mut session = Session::new(Framework::Pytest);
            session.set_code(code);
            let err = session.generate(&backend).expect_err("must fail");
            assert_eq!(err, SubmitError::EmptyCode);
            assert_eq!(
                session.request().error(),
                Some("Please enter some code to analyze.")
            );
        }
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn guard_blocks_mismatch_before_dispatch() {
        let backend = StubBackend::default();
        let mut session = Session::new(Framework::Doctest);
        session.set_code("public class A { }");
        let err = session.generate(&backend).expect_err("must fail");
        assert_eq!(err, SubmitError::JavaRequiresJunit);

        session.set_code("import os");
        session.set_framework(Framework::Junit);
        let err = session.generate(&backend).expect_err("must fail");
        assert_eq!(err, SubmitError::PythonIncompatibleWithJunit);

        assert_eq!(backend.calls.get(), 0);
        assert!(!session.result().has_tests());
    }

    #[test]
    fn success_replaces_result_verbatim() {
        let backend = StubBackend {
            reply: python_reply(),
            ..StubBackend::default()
        };
        let mut session = python_session();
        let result = session.generate(&backend).expect("generate should work");
        assert_eq!(result.detected_language, "Python");
        assert_eq!(result.generated_tests, "def test_x(): ...");
        assert!(!session.request().loading());
        assert!(session.request().error().is_none());
    }

    #[test]
    fn incomplete_reply_uses_sentinels() {
        let backend = StubBackend {
            reply: GenerateReply {
                detected_language: Some("Python".to_string()),
                ..GenerateReply::default()
            },
            ..StubBackend::default()
        };
        let mut session = python_session();
        let result = session.generate(&backend).expect("incomplete is not an error");
        assert_eq!(result.generated_tests, NO_TESTS_GENERATED);
        assert_eq!(result.detected_language, UNDETECTED_LANGUAGE);
    }

    #[test]
    fn error_only_success_reply_uses_sentinels() {
        let backend = StubBackend {
            reply: GenerateReply {
                error: Some("model is warming up".to_string()),
                ..GenerateReply::default()
            },
            ..StubBackend::default()
        };
        let mut session = python_session();
        let result = session.generate(&backend).expect("a 2xx reply is not a failure");
        assert_eq!(result.detected_language, UNDETECTED_LANGUAGE);
        assert_eq!(result.generated_tests, NO_TESTS_GENERATED);
        assert!(session.request().error().is_none());
        assert!(!session.request().loading());
    }

    #[test]
    fn failure_keeps_last_good_result_and_unlocks() {
        let good = StubBackend {
            reply: python_reply(),
            ..StubBackend::default()
        };
        let bad = StubBackend {
            fail: true,
            ..StubBackend::default()
        };
        let mut session = python_session();
        session.generate(&good).expect("first generate should work");

        let err = session.generate(&bad).expect_err("second generate must fail");
        assert!(matches!(err, SubmitError::Transport { ref cause } if cause.contains("refused")));
        assert!(!session.request().loading());
        assert_eq!(
            session.request().error(),
            Some("An error occurred. Please try again later.")
        );
        assert_eq!(session.result().generated_tests, "def test_x(): ...");

        session.generate(&good).expect("retry should be accepted");
        assert!(session.request().error().is_none());
        assert_eq!(good.calls.get(), 2);
    }

    #[test]
    fn empty_feedback_leaves_tests_untouched() {
        let backend = StubBackend {
            reply: python_reply(),
            ..StubBackend::default()
        };
        let mut session = python_session();
        session.generate(&backend).expect("generate should work");

        session.set_feedback("   ");
        let err = session.regenerate(&backend).expect_err("must fail");
        assert_eq!(err, SubmitError::EmptyFeedback);
        assert_eq!(backend.calls.get(), 1);
        assert_eq!(session.result().generated_tests, "def test_x(): ...");
    }

    #[test]
    fn blank_code_blocks_regeneration_even_with_feedback() {
        let backend = StubBackend::default();
        let mut session = Session::new(Framework::Pytest);
        session.set_code(" \n\t");
        session.set_feedback("cover negative numbers");

        let err = session.regenerate(&backend).expect_err("must fail");
        assert_eq!(err, SubmitError::EmptyCode);
        assert_eq!(
            session.request().error(),
            Some("Please enter some code to analyze.")
        );
        assert_eq!(session.feedback(), "cover negative numbers");
        assert_eq!(backend.calls.get(), 0);

        session.set_feedback("");
        let err = session.regenerate(&backend).expect_err("must fail");
        assert_eq!(err, SubmitError::EmptyFeedback);
    }

    #[test]
    fn regenerate_replaces_only_tests() {
        let backend = StubBackend {
            reply: python_reply(),
            regen: RegenerateReply {
                generated_tests: Some("def test_negative(): ...".to_string()),
                error: None,
            },
            ..StubBackend::default()
        };
        let mut session = python_session();
        session.generate(&backend).expect("generate should work");

        session.set_feedback("cover negative numbers");
        let result = session.regenerate(&backend).expect("regenerate should work");
        assert_eq!(result.detected_language, "Python");
        assert_eq!(result.generated_tests, "def test_negative(): ...");
        assert_eq!(session.feedback(), "");

        let sent = backend.last_regen.borrow().clone().expect("request recorded");
        assert_eq!(sent.feedback, "cover negative numbers");
        assert_eq!(sent.framework, Framework::Pytest);
    }

    #[test]
    fn failed_regeneration_keeps_feedback_for_retry() {
        let backend = StubBackend {
            fail: true,
            ..StubBackend::default()
        };
        let mut session = python_session();
        session.set_feedback("more edge cases");
        session.regenerate(&backend).expect_err("must fail");
        assert_eq!(session.feedback(), "more edge cases");
        assert!(!session.request().loading());
        assert!(session.request().error().is_some());
    }
}
