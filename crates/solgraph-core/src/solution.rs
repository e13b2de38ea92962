//! A solution: its projects, the resolved graph and the display levels

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::extractor::ReferenceExtractor;
use crate::fs::FileSystem;
use crate::graph::DependencyGraph;
use crate::levels::assign_levels;
use crate::collation::compare_names;
use crate::model::{CanonicalPath, ProjectEntry, ProjectRecord};
use crate::path;
use crate::problem::Problem;
use crate::report::{LevelReport, ProjectReport, SolutionReport};
use crate::resolver::{DependencyResolver, ResolveOptions};

#[derive(Debug, Clone)]
pub struct Solution {
    root_path: PathBuf,
    name: String,
    directory: Option<PathBuf>,
    projects: Vec<ProjectRecord>,
    projects_by_key: HashMap<CanonicalPath, usize>,
    problems: Vec<Problem>,
    levels: Vec<Vec<usize>>,
    unplaced: Vec<usize>,
    orphan_count: usize,
}

impl Solution {
    /// Create a solution from the manifest path and its parsed entries.
    /// Projects are kept sorted by display name.
    pub fn new(root_path: impl Into<PathBuf>, entries: Vec<ProjectEntry>) -> Self {
        let root_path = root_path.into();
        let name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut projects: Vec<ProjectRecord> = entries.into_iter().map(ProjectRecord::from).collect();
        projects.sort_by(|a, b| compare_names(&a.name, &b.name));

        Solution {
            root_path,
            name,
            directory: None,
            projects,
            projects_by_key: HashMap::new(),
            problems: Vec::new(),
            levels: Vec::new(),
            unplaced: Vec::new(),
            orphan_count: 0,
        }
    }

    /// Resolve every project's references and compute the levels.
    ///
    /// Derived state is rebuilt on each call; problems accumulate.
    pub async fn read_dependencies(
        &mut self,
        fs: &dyn FileSystem,
        extractor: &dyn ReferenceExtractor,
        options: ResolveOptions,
    ) {
        info!("Parsing solution {}...", self.root_path.display());

        let directory = path::absolute(self.root_path.parent().unwrap_or_else(|| Path::new("")));
        let resolver = DependencyResolver::new(fs, extractor).with_options(options);
        let outcome = resolver.resolve(&mut self.projects, &directory).await;

        self.directory = Some(directory);
        self.projects_by_key = outcome.by_key;
        self.problems.extend(outcome.problems);

        let layering = assign_levels(&self.projects);
        self.levels = layering.levels;
        self.unplaced = layering.unplaced;
        self.orphan_count = self.projects.iter().filter(|p| p.is_orphan()).count();

        if options.report_cycles {
            let graph = DependencyGraph::from_projects(&self.projects, &self.projects_by_key);
            for cycle in graph.cycles() {
                let projects = cycle.iter().map(|&i| self.projects[i].name.clone()).collect();
                self.problems.push(Problem::DependencyCycle { projects });
            }
        }

        info!(
            "{} levels, {} orphans, {} unplaced, {} problems",
            self.levels.len(),
            self.orphan_count,
            self.unplaced.len(),
            self.problems.len()
        );
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// File name of the manifest.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory containing the manifest, known once resolved.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn project_by_path(&self, path: &CanonicalPath) -> Option<&ProjectRecord> {
        self.projects_by_key.get(path).map(|&i| &self.projects[i])
    }

    /// Display name for a path: the project's name if it is loaded,
    /// otherwise `?` followed by the file name.
    pub fn safe_project_name(&self, path: &CanonicalPath) -> String {
        match self.project_by_path(path) {
            Some(project) => project.name.clone(),
            None => match path.file_name() {
                Some(file_name) => format!("?{}", file_name),
                None => path.to_string(),
            },
        }
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn problem_messages(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    pub fn levels(&self) -> Vec<Vec<&ProjectRecord>> {
        self.levels
            .iter()
            .map(|level| level.iter().map(|&i| &self.projects[i]).collect())
            .collect()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn orphan_count(&self) -> usize {
        self.orphan_count
    }

    pub fn orphans(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.projects.iter().filter(|p| p.is_orphan())
    }

    /// Connected projects missing from every level (cycles and below).
    pub fn unplaced(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.unplaced.iter().map(|&i| &self.projects[i])
    }

    /// Serializable snapshot of the resolved solution.
    pub fn report(&self) -> SolutionReport {
        let project_report = |project: &ProjectRecord| ProjectReport {
            name: project.name.clone(),
            path: project
                .canonical_path
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| project.relative_path.clone()),
            depends_on: project.depends_on.iter().map(|p| self.safe_project_name(p)).collect(),
            referenced_by: project.referenced_by.iter().map(|p| self.safe_project_name(p)).collect(),
        };

        SolutionReport {
            name: self.name.clone(),
            path: self.root_path.display().to_string(),
            directory: self.directory.as_ref().map(|d| d.display().to_string()),
            project_count: self.projects.len(),
            problems: self.problem_messages(),
            levels: self
                .levels
                .iter()
                .enumerate()
                .map(|(i, level)| LevelReport {
                    level: i + 1,
                    projects: level.iter().map(|&p| project_report(&self.projects[p])).collect(),
                })
                .collect(),
            orphans: self.orphans().map(|p| p.name.clone()).collect(),
            unplaced: self.unplaced().map(|p| p.name.clone()).collect(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
