// Public modules
pub mod code_audit;
pub mod config;
pub mod error;
pub mod namespace;
pub mod project;
pub mod refactor;
pub mod selection;

// Internal modules - not part of public API
pub(crate) mod local_files;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
