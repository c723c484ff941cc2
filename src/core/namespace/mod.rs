//! Namespace primitives shared by the audit and sync operations.
//!
//! - `derive`: expected namespace from a file's path under its project root
//! - `syntax`: parse a C# file, find its namespace declaration, print it back

pub mod derive;
pub mod syntax;

pub use derive::{derive, NAMESPACE_SEPARATOR};
pub use syntax::{NamespaceDecl, SourceTree};
