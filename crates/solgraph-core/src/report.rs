//! Serializable snapshot of a resolved solution

use std::fmt;

use serde::{Deserialize, Serialize};

/// Everything a front end needs to draw the solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    /// Manifest file name.
    pub name: String,
    /// Manifest path as given.
    pub path: String,
    pub directory: Option<String>,
    pub project_count: usize,
    pub problems: Vec<String>,
    pub levels: Vec<LevelReport>,
    /// Names of projects with no edges at all.
    pub orphans: Vec<String>,
    /// Names of connected projects that fit in no level (cycles).
    pub unplaced: Vec<String>,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelReport {
    /// 1-based.
    pub level: usize,
    pub projects: Vec<ProjectReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub name: String,
    pub path: String,
    pub depends_on: Vec<String>,
    pub referenced_by: Vec<String>,
}

impl SolutionReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn orphan_summary(&self) -> String {
        if self.orphans.is_empty() {
            "No orphan projects".to_string()
        } else {
            format!("{} orphan projects: {}", self.orphans.len(), self.orphans.join(", "))
        }
    }
}

/// Plain-text rendering: problems, then one block per level with `»` for
/// dependencies and `«` for referencers.
impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution: {}", self.name)?;
        if let Some(directory) = &self.directory {
            writeln!(f, "{}", directory)?;
        }

        if !self.problems.is_empty() {
            writeln!(f)?;
            writeln!(f, "The following problems were found parsing the solution:")?;
            for problem in &self.problems {
                writeln!(f, "  - {}", problem)?;
            }
        }

        for level in &self.levels {
            writeln!(f)?;
            writeln!(f, "Level {}", level.level)?;
            for project in &level.projects {
                writeln!(f, "  {}", project.name)?;
                for referrer in &project.referenced_by {
                    writeln!(f, "    \u{00AB} {}", referrer)?;
                }
                for dep in &project.depends_on {
                    writeln!(f, "    \u{00BB} {}", dep)?;
                }
            }
        }

        if !self.unplaced.is_empty() {
            writeln!(f)?;
            writeln!(f, "Not placed in any level: {}", self.unplaced.join(", "))?;
        }

        writeln!(f)?;
        write!(f, "{}", self.orphan_summary())
    }
}
