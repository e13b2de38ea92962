//! Core data structures for the solution graph

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Project type GUID of solution folders ("Solution Items").
pub const SOLUTION_FOLDER_KIND: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

/// Project type GUID of web-site projects, which have no project file.
pub const WEB_SITE_KIND: &str = "{E24C65DC-7377-472B-9ABA-BC803B73C61A}";

/// Kinds that are placeholders rather than buildable projects.
pub const PLACEHOLDER_KINDS: [&str; 2] = [SOLUTION_FOLDER_KIND, WEB_SITE_KIND];

/// Absolute, lexically normalized path of a project file.
///
/// This is the only identity used to look up, compare and reference
/// projects. Values are produced by [`crate::path::resolve`], so two
/// spellings of the same location (`..\A\A.csproj` vs `../A/A.csproj`)
/// end up equal. Comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(PathBuf);

impl CanonicalPath {
    pub(crate) fn from_normalized(path: PathBuf) -> Self {
        CanonicalPath(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Directory containing the project file.
    pub fn parent(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<CanonicalPath> for PathBuf {
    fn from(path: CanonicalPath) -> Self {
        path.0
    }
}

/// A validated project line from a solution manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Project type GUID.
    pub kind: String,
    pub name: String,
    /// Path relative to the manifest, as written (may use `\`).
    pub relative_path: String,
    /// Project GUID.
    pub id: String,
}

/// One project of a solution, plus the edges derived while resolving.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    // ── Read from the manifest ──────────────────────────────
    pub kind: String,
    pub name: String,
    pub relative_path: String,
    pub id: String,

    // ── Derived by the resolver ─────────────────────────────
    /// Set on every record during a resolve pass, including missing ones.
    pub canonical_path: Option<CanonicalPath>,
    /// Projects this one declares a reference to, in document order.
    pub depends_on: Vec<CanonicalPath>,
    /// Existing projects that declare a reference to this one.
    pub referenced_by: Vec<CanonicalPath>,
}

impl ProjectRecord {
    /// A project that neither depends on nor is referenced by anything.
    pub fn is_orphan(&self) -> bool {
        self.depends_on.is_empty() && self.referenced_by.is_empty()
    }
}

impl From<ProjectEntry> for ProjectRecord {
    fn from(entry: ProjectEntry) -> Self {
        ProjectRecord {
            kind: entry.kind,
            name: entry.name,
            relative_path: entry.relative_path,
            id: entry.id,
            canonical_path: None,
            depends_on: Vec::new(),
            referenced_by: Vec::new(),
        }
    }
}
