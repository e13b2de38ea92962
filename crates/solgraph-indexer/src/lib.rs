//! Solution manifest and project file parsing

pub mod manifest;
pub mod msbuild;
pub mod fs;
pub mod loader;

#[cfg(test)]
pub mod test_utils;


pub use manifest::{ManifestError, parse_manifest};
pub use msbuild::MsBuildExtractor;
pub use fs::TokioFileSystem;
pub use loader::{LoadOptions, load_solution, load_solution_from};
