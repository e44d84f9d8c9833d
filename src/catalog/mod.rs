//! Version lookup and in-place rewriting for Gradle version catalogs
//!
//! # Modules
//!
//! - [`resolver`]: Finds the entry a request addresses and how its version is written
//! - [`rewriter`]: Replaces a version literal in the raw catalog text
//! - [`updater`]: Read-modify-write cycle over a catalog file
//! - [`error`]: Error types and their classification

pub mod error;
pub mod resolver;
pub mod rewriter;
pub mod updater;

pub use error::{CatalogError, ErrorKind, RewriteError};
pub use resolver::{Resolution, Target, VersionNotation, resolve};
pub use updater::{
    CatalogUpdater, FileCatalogUpdater, UpdateOutcome, UpdateRequest, update_catalog_version,
    update_content,
};
