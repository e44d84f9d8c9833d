//! In-place version rewriting on the raw catalog text
//!
//! The decoded catalog is never serialized back. Each notation has one
//! line-anchored pattern, evaluated only inside the byte span of the table
//! that holds the literal, and only the captured version span is replaced.

use std::ops::Range;

use regex::Regex;
use tracing::debug;

use crate::catalog::error::RewriteError;
use crate::catalog::resolver::VersionNotation;

/// Replace the version literal described by `notation`.
///
/// `scope` is the byte span of the table that holds the literal. Everything
/// outside the replaced version span is returned byte for byte.
pub fn rewrite(
    content: &str,
    scope: Range<usize>,
    notation: &VersionNotation,
    new_version: &str,
) -> Result<String, RewriteError> {
    let pattern = pattern_for(notation)?;
    let table = &content[scope.clone()];

    let span = pattern
        .captures(table)
        .and_then(|captures| captures.name("version"))
        .map(|version| (scope.start + version.start())..(scope.start + version.end()))
        .ok_or_else(|| RewriteError::PatternNotFound {
            notation: notation.describe(),
            key: notation.anchor_key().to_string(),
        })?;

    debug!(
        "Replacing '{}' at bytes {:?} with '{}'",
        &content[span.clone()],
        span,
        new_version
    );

    let mut result = String::with_capacity(content.len() + new_version.len());
    result.push_str(&content[..span.start]);
    result.push_str(new_version);
    result.push_str(&content[span.end..]);
    Ok(result)
}

/// Build the anchored pattern for a notation; the version literal is captured as `version`
fn pattern_for(notation: &VersionNotation) -> Result<Regex, RewriteError> {
    let key = key_pattern(notation.anchor_key());
    let source = match notation {
        // kotlin = "1.9.20"
        // The closing quote must not be followed by another, so `"""..."""` never matches
        VersionNotation::Direct { .. } | VersionNotation::IndirectRef { .. } => {
            format!(r#"(?m)^[ \t]*{key}[ \t]*=[ \t]*"(?P<version>[^"\r\n]*)"(?:[^"]|$)"#)
        }
        // lib = { module = "a:b", version = "1.0" }
        // `version` must directly follow `{` or `,` so `version.ref` never matches
        VersionNotation::InlineLiteral { .. } => format!(
            r#"(?m)^[ \t]*{key}[ \t]*=[ \t]*\{{(?:[^}}\r\n]*,)?[ \t]*version[ \t]*=[ \t]*"(?P<version>[^"\r\n]*)"(?:[^"}}\r\n][^}}\r\n]*)?\}}"#
        ),
        // lib = "group:artifact:1.0"
        VersionNotation::ShortForm { .. } => format!(
            r#"(?m)^[ \t]*{key}[ \t]*=[ \t]*"[^:"\r\n]+:[^:"\r\n]+:(?P<version>[^"\r\n]*)"(?:[^"]|$)"#
        ),
    };

    Ok(Regex::new(&source)?)
}

/// Match a key written bare or quoted
fn key_pattern(key: &str) -> String {
    let escaped = regex::escape(key);
    format!(r#"(?:{escaped}|"{escaped}"|'{escaped}')"#)
}
