//! File selection and the per-file check pipeline

pub mod candidates;
pub mod pipeline;
pub mod selector;

pub use candidates::{CandidateSource, GitStagedFiles, WalkedFiles};
pub use pipeline::{CheckKind, CheckPipeline, CheckResult, FileVerdict, RunVerdict};
pub use selector::FileSelector;
