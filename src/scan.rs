#![forbid(unsafe_code)]

//! Scanners that turn file contents into findings

pub mod construct;
mod finding;
mod position;
pub mod text;

pub use construct::ForbiddenConstructScanner;
pub use finding::{Finding, Location};
pub use position::LineIndex;
pub use text::BlacklistedTextScanner;
