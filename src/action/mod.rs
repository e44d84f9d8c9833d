//! Invocation layer
//!
//! - [`reporter`]: GitHub Actions and console output sinks
//! - [`run`]: Runs one request through a [`CatalogUpdater`](crate::catalog::CatalogUpdater) and reports it

pub mod reporter;
pub mod run;

pub use reporter::{ConsoleFormat, ConsoleReporter, GitHubReporter, Reporter};
pub use run::run;
