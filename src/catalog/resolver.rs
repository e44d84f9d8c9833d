//! Target resolution against a decoded catalog
//!
//! Finds the entry a [`Target`] addresses and classifies where its version
//! literal physically lives ([`VersionNotation`]). This is the only place that
//! discriminates between entry shapes.

use tracing::debug;

use crate::catalog::error::CatalogError;
use crate::parser::types::{Catalog, Entry, Section, VersionSpec, parse_short_notation};

/// What a single invocation addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Key of the `[versions]` table
    Ref(String),
    /// Key, module or group id of a `[libraries]` entry
    Library(String),
    /// Key or id of a `[plugins]` entry
    Plugin(String),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Ref(name) => write!(f, "ref '{name}'"),
            Target::Library(name) => write!(f, "library '{name}'"),
            Target::Plugin(name) => write!(f, "plugin '{name}'"),
        }
    }
}

/// Physical location of a resolved version literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionNotation {
    /// `ref_key = "1.0"` in `[versions]`
    Direct { ref_key: String },
    /// `entry_key = { ..., version = "1.0" }` in `[libraries]` or `[plugins]`
    InlineLiteral { section: Section, entry_key: String },
    /// `entry_key = "group:artifact:1.0"` in `[libraries]`
    ShortForm { entry_key: String },
    /// `entry_key = { ..., version.ref = "ref_key" }`; the literal lives in `[versions]`
    IndirectRef { entry_key: String, ref_key: String },
}

impl VersionNotation {
    /// Table whose text holds the version literal
    pub fn section(&self) -> Section {
        match self {
            VersionNotation::Direct { .. } | VersionNotation::IndirectRef { .. } => {
                Section::Versions
            }
            VersionNotation::InlineLiteral { section, .. } => *section,
            VersionNotation::ShortForm { .. } => Section::Libraries,
        }
    }

    /// Key of the line that holds the version literal
    pub fn anchor_key(&self) -> &str {
        match self {
            VersionNotation::Direct { ref_key } | VersionNotation::IndirectRef { ref_key, .. } => {
                ref_key
            }
            VersionNotation::InlineLiteral { entry_key, .. }
            | VersionNotation::ShortForm { entry_key } => entry_key,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            VersionNotation::Direct { .. } | VersionNotation::IndirectRef { .. } => {
                "version reference"
            }
            VersionNotation::InlineLiteral { .. } => "inline version",
            VersionNotation::ShortForm { .. } => "short notation",
        }
    }
}

/// Result of resolving a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub notation: VersionNotation,
    pub old_version: String,
}

/// Resolve a target to exactly one entry and classify its version notation
pub fn resolve(catalog: &Catalog, target: &Target) -> Result<Resolution, CatalogError> {
    let resolution = match target {
        Target::Ref(name) => {
            let old_version = catalog
                .versions
                .get(name)
                .ok_or_else(|| CatalogError::RefNotFound(name.clone()))?;
            Resolution {
                notation: VersionNotation::Direct {
                    ref_key: name.clone(),
                },
                old_version: old_version.clone(),
            }
        }
        Target::Library(name) => {
            let (key, entry) = find_library(catalog, name)
                .ok_or_else(|| CatalogError::LibraryNotFound(name.clone()))?;
            classify(catalog, Section::Libraries, key, entry)?
        }
        Target::Plugin(name) => {
            let (key, entry) = find_plugin(catalog, name)
                .ok_or_else(|| CatalogError::PluginNotFound(name.clone()))?;
            classify(catalog, Section::Plugins, key, entry)?
        }
    };

    debug!(
        "Resolved {} to {:?} (current version '{}')",
        target, resolution.notation, resolution.old_version
    );

    Ok(resolution)
}

/// Find a library by key, then by module or group id prefix
fn find_library<'a>(catalog: &'a Catalog, name: &str) -> Option<(&'a str, &'a Entry)> {
    if let Some((key, entry)) = catalog.libraries.get_key_value(name) {
        return Some((key.as_str(), entry));
    }

    let group_prefix = format!("{name}:");
    catalog
        .libraries
        .iter()
        .find(|(_, entry)| {
            entry
                .module()
                .is_some_and(|module| module == name || module.starts_with(&group_prefix))
        })
        .map(|(key, entry)| (key.as_str(), entry))
}

/// Find a plugin by key, then by id
fn find_plugin<'a>(catalog: &'a Catalog, name: &str) -> Option<(&'a str, &'a Entry)> {
    if let Some((key, entry)) = catalog.plugins.get_key_value(name) {
        return Some((key.as_str(), entry));
    }

    catalog
        .plugins
        .iter()
        .find(|(_, entry)| entry.id() == Some(name))
        .map(|(key, entry)| (key.as_str(), entry))
}

fn classify(
    catalog: &Catalog,
    section: Section,
    key: &str,
    entry: &Entry,
) -> Result<Resolution, CatalogError> {
    match entry {
        Entry::Short(_) if section == Section::Plugins => Err(CatalogError::InvalidVersionStructure),
        Entry::Short(value) => {
            let short = parse_short_notation(value).ok_or(CatalogError::InvalidShortNotation)?;
            Ok(Resolution {
                notation: VersionNotation::ShortForm {
                    entry_key: key.to_string(),
                },
                old_version: short.version.to_string(),
            })
        }
        Entry::Structured { version, .. } => match version {
            Some(VersionSpec::Literal(literal)) => Ok(Resolution {
                notation: VersionNotation::InlineLiteral {
                    section,
                    entry_key: key.to_string(),
                },
                old_version: literal.clone(),
            }),
            Some(VersionSpec::Ref(ref_key)) => {
                let old_version = catalog
                    .versions
                    .get(ref_key)
                    .ok_or(CatalogError::InvalidVersionStructure)?;
                Ok(Resolution {
                    notation: VersionNotation::IndirectRef {
                        entry_key: key.to_string(),
                        ref_key: ref_key.clone(),
                    },
                    old_version: old_version.clone(),
                })
            }
            Some(VersionSpec::Rich) | None => Err(CatalogError::InvalidVersionStructure),
        },
    }
}
