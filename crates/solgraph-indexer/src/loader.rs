//! Load a solution from disk: manifest, project files, levels

use std::path::Path;

use anyhow::Context;
use solgraph_core::{FileSystem, PLACEHOLDER_KINDS, ResolveOptions, Solution};
use tracing::info;

use crate::fs::TokioFileSystem;
use crate::manifest::parse_manifest;
use crate::msbuild::MsBuildExtractor;

/// Options for loading one solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Project type GUIDs that are not real projects.
    pub excluded_kinds: Vec<String>,
    pub resolve: ResolveOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            excluded_kinds: PLACEHOLDER_KINDS.iter().map(|k| k.to_string()).collect(),
            resolve: ResolveOptions::default(),
        }
    }
}

/// Load and resolve the solution at `path` from the real file system.
pub async fn load_solution(path: &Path, options: &LoadOptions) -> anyhow::Result<Solution> {
    load_solution_from(&TokioFileSystem, path, options).await
}

/// Load and resolve the solution at `path` through `fs`.
///
/// Only an unreadable or unparsable manifest is an error; problems with
/// individual projects end up in [`Solution::problems`].
pub async fn load_solution_from(
    fs: &dyn FileSystem,
    path: &Path,
    options: &LoadOptions,
) -> anyhow::Result<Solution> {
    let text = fs
        .read_text(path)
        .await
        .with_context(|| format!("Cannot read solution file {}", path.display()))?;
    let entries = parse_manifest(&text, &options.excluded_kinds)
        .with_context(|| format!("Cannot parse solution file {}", path.display()))?;

    info!("Found {} projects in {}", entries.len(), path.display());

    let mut solution = Solution::new(path, entries);
    solution
        .read_dependencies(fs, &MsBuildExtractor, options.resolve)
        .await;
    Ok(solution)
}
