//! Dependency resolution: load every project, then link references
//!
//! Resolution runs in two phases. Phase 1 computes each project's
//! canonical path, checks that the file exists and extracts its declared
//! references. Phase 2 links every declared reference to a known project.
//! Phase 2 only starts once phase 1 has finished for all projects, since
//! a project may reference one that is declared later in the manifest.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::extractor::{ExtractError, ReferenceExtractor};
use crate::fs::FileSystem;
use crate::model::{CanonicalPath, ProjectRecord};
use crate::path;
use crate::problem::Problem;

/// Knobs for a resolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Read project files concurrently during phase 1.
    pub parallel_reads: bool,
    /// Add a problem for every dependency cycle, which would otherwise be
    /// silently missing from the levels.
    pub report_cycles: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            parallel_reads: true,
            report_cycles: false,
        }
    }
}

/// What a resolve pass produced besides the edges written into the records.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    /// Problems in discovery order.
    pub problems: Vec<Problem>,
    /// Canonical paths of projects whose file is missing or unreadable.
    pub missing: HashSet<CanonicalPath>,
    /// Index into the project list of every project that was loaded.
    pub by_key: HashMap<CanonicalPath, usize>,
}

/// Result of loading one project file in phase 1.
enum Loaded {
    Missing,
    Unreadable(io::Error),
    Malformed(ExtractError),
    References(Vec<CanonicalPath>),
}

pub struct DependencyResolver<'a> {
    fs: &'a dyn FileSystem,
    extractor: &'a dyn ReferenceExtractor,
    options: ResolveOptions,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem, extractor: &'a dyn ReferenceExtractor) -> Self {
        DependencyResolver {
            fs,
            extractor,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Resolve `projects` in place. Never fails: every issue becomes a
    /// [`Problem`] in the outcome.
    pub async fn resolve(&self, projects: &mut [ProjectRecord], manifest_dir: &Path) -> ResolveOutcome {
        info!("Resolving {} projects in {}", projects.len(), manifest_dir.display());

        let mut outcome = ResolveOutcome::default();

        let keys: Vec<CanonicalPath> = projects
            .iter()
            .map(|p| path::resolve(manifest_dir, &p.relative_path))
            .collect();
        for (project, key) in projects.iter_mut().zip(&keys) {
            project.depends_on.clear();
            project.referenced_by.clear();
            project.canonical_path = Some(key.clone());
        }

        // Phase 1: reads may overlap, results are applied in list order.
        let loaded = if self.options.parallel_reads {
            join_all(keys.iter().map(|key| self.load(key))).await
        } else {
            let mut loaded = Vec::with_capacity(keys.len());
            for key in &keys {
                loaded.push(self.load(key).await);
            }
            loaded
        };

        for (index, (project, result)) in projects.iter_mut().zip(loaded).enumerate() {
            let key = keys[index].clone();
            match result {
                Loaded::Missing => {
                    warn!("Project file {} does not exist", key);
                    outcome.problems.push(Problem::MissingProjectFile { path: key.clone() });
                    outcome.missing.insert(key);
                }
                Loaded::Unreadable(e) => {
                    warn!("Cannot read project file {}: {}", key, e);
                    outcome.problems.push(Problem::UnreadableProjectFile {
                        path: key.clone(),
                        reason: e.to_string(),
                    });
                    outcome.missing.insert(key);
                }
                Loaded::Malformed(e) => {
                    warn!("Cannot parse project file {}: {}", key, e);
                    outcome.problems.push(Problem::MalformedProjectContent {
                        path: key.clone(),
                        reason: e.to_string(),
                    });
                    outcome.by_key.insert(key, index);
                }
                Loaded::References(references) => {
                    debug!("{} declares {} references", project.name, references.len());
                    project.depends_on = references;
                    outcome.by_key.insert(key, index);
                }
            }
        }

        // Phase 2: link references to loaded projects.
        let mut links = Vec::new();
        for (index, project) in projects.iter().enumerate() {
            for dep in &project.depends_on {
                if outcome.missing.contains(dep) {
                    continue;
                }
                match outcome.by_key.get(dep) {
                    Some(&target) => links.push((target, keys[index].clone())),
                    None => outcome.problems.push(Problem::UnresolvedReference {
                        project: project.name.clone(),
                        reference: dep.clone(),
                    }),
                }
            }
        }
        for (target, source) in links {
            projects[target].referenced_by.push(source);
        }

        info!(
            "Resolved {} of {} projects with {} problems",
            outcome.by_key.len(),
            projects.len(),
            outcome.problems.len()
        );
        outcome
    }

    async fn load(&self, key: &CanonicalPath) -> Loaded {
        if !self.fs.exists(key.as_path()).await {
            return Loaded::Missing;
        }
        let text = match self.fs.read_text(key.as_path()).await {
            Ok(text) => text,
            Err(e) => return Loaded::Unreadable(e),
        };
        match self.extractor.extract_references(&text, key.parent()) {
            Ok(references) => Loaded::References(references),
            Err(e) => Loaded::Malformed(e),
        }
    }
}
