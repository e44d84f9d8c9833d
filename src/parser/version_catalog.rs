//! Gradle version catalog (libs.versions.toml) parser
//!
//! Decodes the `[versions]`, `[libraries]` and `[plugins]` tables into a
//! read-only [`Catalog`]. Only entries written as `key = "string"` or
//! `key = { ... }` are decoded; anything else is skipped.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::parser::error::ParseError;
use crate::parser::types::{Catalog, Entry, Section, VersionSpec};

/// Parser for libs.versions.toml files
pub struct VersionCatalogParser;

impl VersionCatalogParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VersionCatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded value inside an inline table
#[derive(Debug, Clone, PartialEq)]
enum Value {
    String(String),
    Table(IndexMap<String, Value>),
    Other,
}

impl VersionCatalogParser {
    /// Parse the content into a catalog view
    pub fn parse(&self, content: &str) -> Result<Catalog, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_toml_ng::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set TOML language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse TOML content");
            ParseError::ParseFailed("Failed to parse TOML".to_string())
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let position = first_error_position(root).unwrap_or_else(|| root.start_position());
            return Err(ParseError::InvalidSyntax {
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        let mut catalog = Catalog::default();
        let mut seen_tables = HashSet::new();
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            if child.kind() == "table" {
                self.process_table(child, content, &mut catalog, &mut seen_tables)?;
            }
        }

        debug!(
            versions = catalog.versions.len(),
            libraries = catalog.libraries.len(),
            plugins = catalog.plugins.len(),
            "Decoded version catalog"
        );

        Ok(catalog)
    }

    /// Process a TOML table node
    fn process_table(
        &self,
        table_node: tree_sitter::Node,
        content: &str,
        catalog: &mut Catalog,
        seen_tables: &mut HashSet<String>,
    ) -> Result<(), ParseError> {
        let mut cursor = table_node.walk();
        let Some(segments) = table_node
            .children(&mut cursor)
            .find(|child| is_key(child.kind()))
            .and_then(|key| key_segments(key, content))
        else {
            return Ok(());
        };

        let name = segments.join(".");
        if !seen_tables.insert(name.clone()) {
            return Err(ParseError::DuplicateTable(name));
        }

        let Ok(section) = name.parse::<Section>() else {
            debug!("Skipping table [{}]", name);
            return Ok(());
        };

        catalog.spans.insert(section, table_node.byte_range());

        let mut seen_keys = HashSet::new();
        let mut cursor = table_node.walk();
        for child in table_node.children(&mut cursor) {
            if child.kind() == "pair" {
                self.process_pair(child, content, section, catalog, &mut seen_keys)?;
            }
        }

        Ok(())
    }

    /// Decode a `key = value` pair of one of the catalog tables
    fn process_pair(
        &self,
        pair_node: tree_sitter::Node,
        content: &str,
        section: Section,
        catalog: &mut Catalog,
        seen_keys: &mut HashSet<String>,
    ) -> Result<(), ParseError> {
        let Some((key_node, value_node)) = split_pair(pair_node) else {
            return Ok(());
        };
        let Some(segments) = key_segments(key_node, content) else {
            return Ok(());
        };

        // Dotted entries such as `kotlin.module = "..."` are not supported
        let [key] = segments.as_slice() else {
            debug!(
                "Skipping dotted key '{}' in [{}]",
                segments.join("."),
                section
            );
            return Ok(());
        };

        if !seen_keys.insert(key.clone()) {
            return Err(ParseError::DuplicateKey {
                table: section.to_string(),
                key: key.clone(),
            });
        }

        let value = decode_value(value_node, content, section)?;
        match section {
            Section::Versions => match value {
                Value::String(version) => {
                    catalog.versions.insert(key.clone(), version);
                }
                _ => debug!("Skipping non-literal version '{}'", key),
            },
            Section::Libraries | Section::Plugins => {
                let entry = match value {
                    Value::String(short) => Entry::Short(short),
                    Value::Table(table) => entry_from_table(&table),
                    Value::Other => {
                        debug!("Skipping unsupported entry '{}' in [{}]", key, section);
                        return Ok(());
                    }
                };
                let entries = match section {
                    Section::Libraries => &mut catalog.libraries,
                    _ => &mut catalog.plugins,
                };
                entries.insert(key.clone(), entry);
            }
        }

        Ok(())
    }
}

fn is_key(kind: &str) -> bool {
    matches!(kind, "bare_key" | "quoted_key" | "dotted_key")
}

/// Split a pair node into its key and value nodes, ignoring comments
fn split_pair(pair_node: tree_sitter::Node) -> Option<(tree_sitter::Node, tree_sitter::Node)> {
    let mut cursor = pair_node.walk();
    let mut nodes = pair_node
        .named_children(&mut cursor)
        .filter(|node| node.kind() != "comment");
    let key = nodes.next()?;
    let value = nodes.next()?;
    Some((key, value))
}

/// Collect the segments of a bare, quoted or dotted key
fn key_segments(node: tree_sitter::Node, content: &str) -> Option<Vec<String>> {
    match node.kind() {
        "bare_key" => Some(vec![content[node.byte_range()].to_string()]),
        "quoted_key" => Some(vec![unquote(&content[node.byte_range()])]),
        "dotted_key" => {
            let mut segments = Vec::new();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                segments.extend(key_segments(child, content)?);
            }
            Some(segments)
        }
        _ => None,
    }
}

fn decode_value(
    node: tree_sitter::Node,
    content: &str,
    section: Section,
) -> Result<Value, ParseError> {
    match node.kind() {
        "string" => Ok(Value::String(unquote(&content[node.byte_range()]))),
        "inline_table" => decode_inline_table(node, content, section).map(Value::Table),
        _ => Ok(Value::Other),
    }
}

/// Decode an inline table, nesting dotted keys (`version.ref = "x"`)
fn decode_inline_table(
    table_node: tree_sitter::Node,
    content: &str,
    section: Section,
) -> Result<IndexMap<String, Value>, ParseError> {
    let mut table = IndexMap::new();
    let mut cursor = table_node.walk();

    for child in table_node.children(&mut cursor) {
        if child.kind() != "pair" {
            continue;
        }
        let Some((key_node, value_node)) = split_pair(child) else {
            continue;
        };
        let Some(segments) = key_segments(key_node, content) else {
            continue;
        };
        let value = decode_value(value_node, content, section)?;
        insert_dotted(&mut table, &segments, value).map_err(|key| ParseError::DuplicateKey {
            table: section.to_string(),
            key,
        })?;
    }

    Ok(table)
}

/// Insert a value under a dotted key path. Returns the conflicting key on error.
fn insert_dotted(
    table: &mut IndexMap<String, Value>,
    segments: &[String],
    value: Value,
) -> Result<(), String> {
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = table;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Table(IndexMap::new()));
        match slot {
            Value::Table(inner) => current = inner,
            _ => return Err(segments.join(".")),
        }
    }

    if current.contains_key(last) {
        return Err(segments.join("."));
    }
    current.insert(last.clone(), value);
    Ok(())
}

fn entry_from_table(table: &IndexMap<String, Value>) -> Entry {
    let string_field = |name: &str| match table.get(name) {
        Some(Value::String(value)) => Some(value.clone()),
        _ => None,
    };

    let module = string_field("module").or_else(|| {
        let group = string_field("group")?;
        let name = string_field("name")?;
        Some(format!("{group}:{name}"))
    });

    let version = table.get("version").map(|value| match value {
        Value::String(literal) => VersionSpec::Literal(literal.clone()),
        Value::Table(inner) => match inner.get("ref") {
            Some(Value::String(reference)) if inner.len() == 1 => {
                VersionSpec::Ref(reference.clone())
            }
            _ => VersionSpec::Rich,
        },
        Value::Other => VersionSpec::Rich,
    });

    Entry::Structured {
        module,
        id: string_field("id"),
        version,
    }
}

/// Find the position of the first error or missing node
fn first_error_position(node: tree_sitter::Node) -> Option<tree_sitter::Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if (child.has_error() || child.is_missing())
            && let Some(position) = first_error_position(child)
        {
            return Some(position);
        }
    }
    None
}

/// Strip the quotes of a TOML string and decode basic-string escapes
fn unquote(raw: &str) -> String {
    if let Some(inner) = raw
        .strip_prefix("\"\"\"")
        .and_then(|s| s.strip_suffix("\"\"\""))
    {
        unescape(trim_leading_newline(inner))
    } else if let Some(inner) = raw.strip_prefix("'''").and_then(|s| s.strip_suffix("'''")) {
        trim_leading_newline(inner).to_string()
    } else if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        unescape(inner)
    } else if let Some(inner) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        inner.to_string()
    } else {
        raw.to_string()
    }
}

fn trim_leading_newline(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(marker @ ('u' | 'U')) => {
                let len = if marker == 'u' { 4 } else { 8 };
                let hex: String = chars.by_ref().take(len).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => result.push(decoded),
                    None => {
                        result.push('\\');
                        result.push(marker);
                        result.push_str(&hex);
                    }
                }
            }
            // Line-ending backslash in multi-line strings
            Some(ws) if ws.is_whitespace() => {
                while chars.peek().is_some_and(|next| next.is_whitespace()) {
                    chars.next();
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}
