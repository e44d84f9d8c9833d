//! Decoded view of a version catalog

use std::ops::Range;

use indexmap::IndexMap;

/// Top-level table of a version catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `[versions]`: named version references
    Versions,
    /// `[libraries]`: library coordinates
    Libraries,
    /// `[plugins]`: Gradle plugin ids
    Plugins,
}

impl Section {
    /// Returns the table name as written in the catalog
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Versions => "versions",
            Section::Libraries => "libraries",
            Section::Plugins => "plugins",
        }
    }
}

impl std::str::FromStr for Section {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "versions" => Ok(Section::Versions),
            "libraries" => Ok(Section::Libraries),
            "plugins" => Ok(Section::Plugins),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version field of a structured library or plugin entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// `version = "1.0.0"`
    Literal(String),
    /// `version.ref = "kotlin"` or `version = { ref = "kotlin" }`
    Ref(String),
    /// Any other shape, e.g. `version = { strictly = "[1.0, 2.0)" }`
    Rich,
}

/// A library or plugin entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `"group:artifact:version"` kept exactly as written
    Short(String),
    /// Inline table such as `{ module = "...", version = "..." }`
    Structured {
        /// `module`, or `group:name` when the entry spells them out separately
        module: Option<String>,
        /// Plugin id
        id: Option<String>,
        version: Option<VersionSpec>,
    },
}

impl Entry {
    /// Module coordinate of the entry, parsing short notation when needed
    pub fn module(&self) -> Option<&str> {
        match self {
            Entry::Short(value) => parse_short_notation(value).map(|short| short.module),
            Entry::Structured { module, .. } => module.as_deref(),
        }
    }

    /// Plugin id of the entry
    pub fn id(&self) -> Option<&str> {
        match self {
            Entry::Short(_) => None,
            Entry::Structured { id, .. } => id.as_deref(),
        }
    }
}

/// Parsed `group:artifact:version` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortNotation<'a> {
    /// `group:artifact`
    pub module: &'a str,
    pub version: &'a str,
}

/// Split a short notation string into module and version.
///
/// Returns None unless the value has exactly three colon-separated segments.
pub fn parse_short_notation(value: &str) -> Option<ShortNotation<'_>> {
    if value.split(':').count() != 3 {
        return None;
    }
    let (module, version) = value.rsplit_once(':')?;
    Some(ShortNotation { module, version })
}

/// Read-only view of a `libs.versions.toml` document.
///
/// Maps keep document order so scans by module or id return the first
/// matching entry as it appears in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub versions: IndexMap<String, String>,
    pub libraries: IndexMap<String, Entry>,
    pub plugins: IndexMap<String, Entry>,
    /// Byte span of each top-level table in the source text
    pub spans: IndexMap<Section, Range<usize>>,
}

impl Catalog {
    /// Byte span of a table in the source, if the catalog declares it
    pub fn span(&self, section: Section) -> Option<Range<usize>> {
        self.spans.get(&section).cloned()
    }
}
