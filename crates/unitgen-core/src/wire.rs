use crate::Framework;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Where the generation service listens unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const GENERATE_PATH: &str = "/generate_tests";
pub const REGENERATE_PATH: &str = "/regenerate_tests_with_feedback";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub code: String,
    pub framework: Framework,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegenerateRequest {
    pub code: String,
    pub framework: Framework,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct GenerateReply {
    #[serde(default)]
    pub detected_language: Option<String>,
    #[serde(default)]
    pub generated_tests: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RegenerateReply {
    #[serde(default)]
    pub generated_tests: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The remote test-generation service. Implementations return `Err` for
/// transport failures only; incomplete replies are still `Ok`.
pub trait GenerationBackend {
    fn generate_tests(&self, req: &GenerateRequest) -> Result<GenerateReply>;
    fn regenerate_with_feedback(&self, req: &RegenerateRequest) -> Result<RegenerateReply>;
}

impl<B: GenerationBackend + ?Sized> GenerationBackend for &B {
    fn generate_tests(&self, req: &GenerateRequest) -> Result<GenerateReply> {
        (**self).generate_tests(req)
    }

    fn regenerate_with_feedback(&self, req: &RegenerateRequest) -> Result<RegenerateReply> {
        (**self).regenerate_with_feedback(req)
    }
}
