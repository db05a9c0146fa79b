use thiserror::Error;

/// Everything that can stop a submission. `Display` is the message shown to
/// the user; the transport cause is kept for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please enter some code to analyze.")]
    EmptyCode,
    #[error("Please enter feedback to regenerate test cases.")]
    EmptyFeedback,
    #[error("Java code detected. Please select JUnit as the testing framework.")]
    JavaRequiresJunit,
    #[error("Python code detected. JUnit is not compatible. Please select Pytest or Doctest.")]
    PythonIncompatibleWithJunit,
    #[error("An error occurred. Please try again later.")]
    Transport { cause: String },
}
