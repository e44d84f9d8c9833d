//! Read-modify-write cycle over a catalog file

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::error::{CatalogError, RewriteError};
use crate::catalog::resolver::{Target, VersionNotation, resolve};
use crate::catalog::rewriter::rewrite;
use crate::config::catalog_path;
use crate::parser::types::{Catalog, Entry, Section, VersionSpec};
use crate::parser::version_catalog::VersionCatalogParser;

/// Parameters of a single invocation.
///
/// Empty strings are treated as absent, matching how action inputs arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    pub library: Option<String>,
    pub plugin: Option<String>,
    /// New version to write; None only reads the current one
    pub version: Option<String>,
    /// Catalog location, defaults to `gradle/libs.versions.toml`
    pub catalog: Option<PathBuf>,
}

impl UpdateRequest {
    /// Parse a request from a JSON object such as `{"ref": "kotlin", "version": "2.0.0"}`
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        if value
            .get("version")
            .is_some_and(|version| !version.is_string() && !version.is_null())
        {
            return Err(CatalogError::VersionNotString);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The single ref, library or plugin this request addresses
    pub fn target(&self) -> Result<Target, CatalogError> {
        let mut provided = [
            non_empty(&self.ref_name).map(|name| Target::Ref(name.to_string())),
            non_empty(&self.library).map(|name| Target::Library(name.to_string())),
            non_empty(&self.plugin).map(|name| Target::Plugin(name.to_string())),
        ]
        .into_iter()
        .flatten();

        let target = provided.next().ok_or(CatalogError::MissingTarget)?;
        if provided.next().is_some() {
            return Err(CatalogError::ConflictingTargets);
        }
        Ok(target)
    }

    pub fn new_version(&self) -> Option<&str> {
        non_empty(&self.version)
    }

    pub fn catalog_path(&self) -> PathBuf {
        catalog_path(self.catalog.as_deref())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Result of an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub old_version: String,
    /// Set only when a new version was requested and written
    pub version: Option<String>,
}

impl UpdateOutcome {
    /// True when a new version was applied and differs from the old one
    pub fn updated(&self) -> bool {
        self.version
            .as_ref()
            .is_some_and(|version| *version != self.old_version)
    }

    /// The version the catalog holds after the invocation
    pub fn current_version(&self) -> &str {
        self.version.as_deref().unwrap_or(&self.old_version)
    }
}

/// Trait for running an update request against a catalog
#[cfg_attr(test, automock)]
pub trait CatalogUpdater {
    fn update(&self, request: &UpdateRequest) -> Result<UpdateOutcome, CatalogError>;
}

/// Updater backed by the catalog file named in the request
#[derive(Debug, Default, Clone, Copy)]
pub struct FileCatalogUpdater;

impl CatalogUpdater for FileCatalogUpdater {
    fn update(&self, request: &UpdateRequest) -> Result<UpdateOutcome, CatalogError> {
        update_catalog_version(request)
    }
}

/// Resolve the requested entry and, if a version was given, rewrite it in place.
///
/// The file is written at most once, and only after resolution, rewriting and
/// verification succeeded.
pub fn update_catalog_version(request: &UpdateRequest) -> Result<UpdateOutcome, CatalogError> {
    let target = request.target()?;
    let new_version = request.new_version();
    let path = request.catalog_path();

    let content = read_catalog(&path)?;
    let (updated_content, outcome) = update_content(&content, &target, new_version)?;

    if updated_content != content {
        fs::write(&path, &updated_content).map_err(|source| CatalogError::Write {
            path: path.clone(),
            source,
        })?;
        info!(
            "Updated {} from '{}' to '{}' in {:?}",
            target,
            outcome.old_version,
            outcome.current_version(),
            path
        );
    } else {
        debug!("Catalog {:?} left unchanged", path);
    }

    Ok(outcome)
}

fn read_catalog(path: &Path) -> Result<String, CatalogError> {
    debug!("Reading catalog {:?}", path);
    fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply a request to catalog text without touching the filesystem.
///
/// Returns the new text (identical to `content` when no version is given)
/// together with the outcome.
pub fn update_content(
    content: &str,
    target: &Target,
    new_version: Option<&str>,
) -> Result<(String, UpdateOutcome), CatalogError> {
    let parser = VersionCatalogParser::new();
    let catalog = parser.parse(content)?;
    let resolution = resolve(&catalog, target)?;

    let Some(new_version) = new_version else {
        return Ok((
            content.to_string(),
            UpdateOutcome {
                old_version: resolution.old_version,
                version: None,
            },
        ));
    };

    ensure_writable(&resolution.notation, new_version)?;

    let section = resolution.notation.section();
    let scope = catalog
        .span(section)
        .ok_or(RewriteError::SectionNotFound(section.as_str()))?;
    let rewritten = rewrite(content, scope, &resolution.notation, new_version)?;

    let mut expected = catalog;
    apply_to_view(&mut expected, &resolution.notation, new_version);
    let verification_failed =
        || RewriteError::VerificationFailed(resolution.notation.anchor_key().to_string());
    let actual = parser.parse(&rewritten).map_err(|e| {
        warn!("Rewritten catalog no longer parses: {}", e);
        verification_failed()
    })?;
    if !same_entries(&actual, &expected) {
        return Err(verification_failed().into());
    }

    Ok((
        rewritten,
        UpdateOutcome {
            old_version: resolution.old_version,
            version: Some(new_version.to_string()),
        },
    ))
}

/// Reject versions that would change the meaning of the surrounding text
fn ensure_writable(notation: &VersionNotation, version: &str) -> Result<(), CatalogError> {
    let breaks_string = version
        .chars()
        .any(|c| c == '"' || c == '\\' || c.is_control());
    let breaks_short_notation =
        matches!(notation, VersionNotation::ShortForm { .. }) && version.contains(':');

    if breaks_string || breaks_short_notation {
        return Err(CatalogError::UnwritableVersion(version.to_string()));
    }
    Ok(())
}

/// Update the decoded view the way the rewrite should have updated the text
fn apply_to_view(catalog: &mut Catalog, notation: &VersionNotation, new_version: &str) {
    match notation {
        VersionNotation::Direct { ref_key } | VersionNotation::IndirectRef { ref_key, .. } => {
            if let Some(version) = catalog.versions.get_mut(ref_key) {
                *version = new_version.to_string();
            }
        }
        VersionNotation::InlineLiteral { section, entry_key } => {
            let entries = match section {
                Section::Plugins => &mut catalog.plugins,
                _ => &mut catalog.libraries,
            };
            if let Some(Entry::Structured { version, .. }) = entries.get_mut(entry_key) {
                *version = Some(VersionSpec::Literal(new_version.to_string()));
            }
        }
        VersionNotation::ShortForm { entry_key } => {
            if let Some(Entry::Short(value)) = catalog.libraries.get_mut(entry_key)
                && let Some((module, _)) = value.rsplit_once(':')
            {
                let updated = format!("{module}:{new_version}");
                *value = updated;
            }
        }
    }
}

fn same_entries(actual: &Catalog, expected: &Catalog) -> bool {
    actual.versions == expected.versions
        && actual.libraries == expected.libraries
        && actual.plugins == expected.plugins
}
