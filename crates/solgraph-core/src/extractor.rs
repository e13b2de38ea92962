//! Reference extractor trait definition

use std::path::Path;

use thiserror::Error;

use crate::model::CanonicalPath;

/// Content of a project file that cannot be read as a markup document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {position})")]
pub struct ExtractError {
    pub position: u64,
    pub message: String,
}

impl ExtractError {
    pub fn new(position: u64, message: impl Into<String>) -> Self {
        ExtractError {
            position,
            message: message.into(),
        }
    }
}

/// Pulls the inter-project references out of one project file.
pub trait ReferenceExtractor: Send + Sync {
    /// Return the referenced project paths, resolved against `project_dir`,
    /// in document order.
    fn extract_references(
        &self,
        content: &str,
        project_dir: &Path,
    ) -> Result<Vec<CanonicalPath>, ExtractError>;
}
