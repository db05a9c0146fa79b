//! Client-side core of the unit test generator: form state, the heuristic
//! framework guard, the two service round trips and result export.

pub mod error;
pub mod framework;
pub mod guard;
pub mod model;
pub mod present;
pub mod report;
pub mod session;
pub mod wire;

pub use error::SubmitError;
pub use framework::{Framework, UnknownFramework};
pub use guard::{LanguageHints, check_framework, sniff};
pub use model::{
    FeedbackNote, GenerationResult, NO_TESTS_GENERATED, RequestState, SourceSubmission,
    UNDETECTED_LANGUAGE,
};
pub use present::{
    Clipboard, SystemClipboard, copy_to_clipboard, export_file_name, extension_for,
    render_result, save_to_dir, save_to_path,
};
pub use report::{ReportEntry, collect_entries, framework_for_path, render_report};
pub use session::Session;
pub use wire::{
    DEFAULT_BASE_URL, GENERATE_PATH, GenerateReply, GenerateRequest, GenerationBackend, REGENERATE_PATH,
    RegenerateReply, RegenerateRequest,
};
