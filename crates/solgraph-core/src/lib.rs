//! Project model, path resolution, dependency resolution and level assignment

pub mod model;
pub mod collation;
pub mod path;
pub mod fs;
pub mod extractor;
pub mod problem;
pub mod resolver;
pub mod levels;
pub mod graph;
pub mod solution;
pub mod report;


pub use model::{CanonicalPath, ProjectEntry, ProjectRecord, SOLUTION_FOLDER_KIND, WEB_SITE_KIND, PLACEHOLDER_KINDS};
pub use collation::compare_names;
pub use fs::{FileSystem, MemoryFileSystem};
pub use extractor::{ExtractError, ReferenceExtractor};
pub use problem::Problem;
pub use resolver::{DependencyResolver, ResolveOptions, ResolveOutcome};
pub use levels::{Layering, assign_levels};
pub use graph::DependencyGraph;
pub use solution::Solution;
pub use report::{LevelReport, ProjectReport, SolutionReport};
