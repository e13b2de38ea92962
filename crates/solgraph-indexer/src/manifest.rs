//! Solution manifest (`.sln`) parsing
//!
//! Each `Project("<kind>") = "<name>", "<path>", "<id>"` line is captured
//! untyped first, then validated field by field into a [`ProjectEntry`].

use std::sync::LazyLock;

use regex::Regex;
use solgraph_core::ProjectEntry;
use thiserror::Error;

static PROJECT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^Project\("(?P<kind>[^"]+)"\) = "(?P<name>[^"]+)", "(?P<path>[^"]+)", "(?P<id>[^"]+)""#)
        .expect("project line pattern is valid")
});

static GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}$")
        .expect("guid pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("line {line}: invalid project {field} '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Captures of one project line, not yet validated.
#[derive(Debug)]
struct RawProjectLine<'a> {
    line: usize,
    kind: &'a str,
    name: &'a str,
    path: &'a str,
    id: &'a str,
}

impl RawProjectLine<'_> {
    fn validate(self) -> Result<ProjectEntry, ManifestError> {
        let invalid = |field: &'static str, value: &str| ManifestError::InvalidField {
            line: self.line,
            field,
            value: value.to_string(),
        };

        if !GUID.is_match(self.kind) {
            return Err(invalid("type", self.kind));
        }
        if !GUID.is_match(self.id) {
            return Err(invalid("id", self.id));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name", self.name));
        }
        if self.path.trim().is_empty() {
            return Err(invalid("path", self.path));
        }

        Ok(ProjectEntry {
            kind: self.kind.to_string(),
            name: self.name.to_string(),
            relative_path: self.path.to_string(),
            id: self.id.to_string(),
        })
    }
}

/// Parse every project entry of a manifest, in file order, dropping
/// entries whose type GUID is in `excluded_kinds` (compared ignoring case).
pub fn parse_manifest(text: &str, excluded_kinds: &[String]) -> Result<Vec<ProjectEntry>, ManifestError> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut entries = Vec::new();

    for captures in PROJECT_LINE.captures_iter(text) {
        let Some(whole) = captures.get(0) else { continue };
        let raw = RawProjectLine {
            line: line_number(text, whole.start()),
            kind: captures.name("kind").map_or("", |m| m.as_str()),
            name: captures.name("name").map_or("", |m| m.as_str()),
            path: captures.name("path").map_or("", |m| m.as_str()),
            id: captures.name("id").map_or("", |m| m.as_str()),
        };

        if excluded_kinds.iter().any(|k| k.eq_ignore_ascii_case(raw.kind)) {
            tracing::debug!("Skipping placeholder entry '{}' on line {}", raw.name, raw.line);
            continue;
        }
        entries.push(raw.validate()?);
    }

    Ok(entries)
}

fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}
