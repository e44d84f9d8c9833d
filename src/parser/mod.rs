//! Parser layer
//! - types.rs: Decoded catalog view (Catalog, Entry, Section)
//! - version_catalog.rs: libs.versions.toml parser
//! - error.rs: Parse errors

pub mod error;
pub mod types;
pub mod version_catalog;

pub use error::ParseError;
pub use types::{Catalog, Entry, Section, VersionSpec};
pub use version_catalog::VersionCatalogParser;
