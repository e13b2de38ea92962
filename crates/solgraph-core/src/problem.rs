//! Diagnostics collected while resolving a solution

use thiserror::Error;

use crate::model::CanonicalPath;

/// A non-fatal problem found during a resolve pass.
///
/// The `Display` text is what gets shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("Project file '{path}' does not exist")]
    MissingProjectFile { path: CanonicalPath },

    #[error("Project file '{path}' could not be read: {reason}")]
    UnreadableProjectFile { path: CanonicalPath, reason: String },

    #[error("Project file '{path}' could not be parsed: {reason}")]
    MalformedProjectContent { path: CanonicalPath, reason: String },

    #[error("Project '{project}' references unknown project '{reference}'. Add this project to the solution")]
    UnresolvedReference {
        project: String,
        reference: CanonicalPath,
    },

    /// Only reported when cycle reporting is switched on.
    #[error("Dependency cycle between {}; these projects are not shown in any level", .projects.join(", "))]
    DependencyCycle { projects: Vec<String> },
}
