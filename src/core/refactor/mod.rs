//! Structural refactoring — bring a file's namespace declaration in line with
//! its location.
//!
//! Operates on the namespace clause of one file in isolation; `using`
//! directives and references in other files are left alone.

mod sync;

pub use sync::{apply_sync, plan_sync, rewrite, sync_file, SyncPlan, SyncResult};
