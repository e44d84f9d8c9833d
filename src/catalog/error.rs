use std::path::PathBuf;

use thiserror::Error;

use crate::parser::error::ParseError;

/// Coarse classification of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad, missing or conflicting invocation parameters
    Validation,
    /// The requested ref, library or plugin does not exist
    NotFound,
    /// The entry exists but its version cannot be interpreted
    Malformed,
    /// The catalog is not a valid TOML document
    Parse,
    /// The raw text and the decoded view disagree
    Inconsistent,
    /// Reading or writing the catalog failed
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Malformed => "malformed",
            ErrorKind::Parse => "parse",
            ErrorKind::Inconsistent => "inconsistent",
            ErrorKind::Io => "io",
        }
    }
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("could not locate {notation} for '{key}' in the catalog text")]
    PatternNotFound { notation: &'static str, key: String },

    #[error("[{0}] section not found in the catalog text")]
    SectionNotFound(&'static str),

    #[error("catalog does not decode as expected after rewriting '{0}'")]
    VerificationFailed(String),

    #[error("invalid rewrite pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("One of ref, library, or plugin must be provided")]
    MissingTarget,

    #[error("Only one of ref, library, or plugin can be provided")]
    ConflictingTargets,

    #[error("version is not a string")]
    VersionNotString,

    #[error("version '{0}' cannot be written into a TOML string")]
    UnwritableVersion(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("ref '{0}' not found in [versions] section")]
    RefNotFound(String),

    #[error("library '{0}' not found in [libraries] section")]
    LibraryNotFound(String),

    #[error("plugin '{0}' not found in [plugins] section")]
    PluginNotFound(String),

    #[error("Invalid short notation format")]
    InvalidShortNotation,

    #[error("Invalid version structure")]
    InvalidVersionStructure,

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("Failed to read catalog {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write catalog {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::MissingTarget
            | CatalogError::ConflictingTargets
            | CatalogError::VersionNotString
            | CatalogError::UnwritableVersion(_)
            | CatalogError::InvalidRequest(_) => ErrorKind::Validation,
            CatalogError::RefNotFound(_)
            | CatalogError::LibraryNotFound(_)
            | CatalogError::PluginNotFound(_) => ErrorKind::NotFound,
            CatalogError::InvalidShortNotation | CatalogError::InvalidVersionStructure => {
                ErrorKind::Malformed
            }
            CatalogError::Parse(_) => ErrorKind::Parse,
            CatalogError::Rewrite(_) => ErrorKind::Inconsistent,
            CatalogError::Read { .. } | CatalogError::Write { .. } => ErrorKind::Io,
        }
    }
}
