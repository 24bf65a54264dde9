//! Files of the conventional Python project layout and the little parsing done on them.

use anyhow::{Context, Result};
use fs_err as fs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const REQUIREMENTS: &str = "requirements.txt";
pub const DEV_REQUIREMENTS: &str = "dev-requirements.txt";
pub const DEV_REQUIREMENTS_IN: &str = "dev-requirements.in";
pub const PYPROJECT: &str = "pyproject.toml";
pub const SETUP_PY: &str = "setup.py";
pub const DIST_DIR: &str = "dist";
pub const COVERAGE: &str = ".coverage";

#[derive(Debug, Deserialize, Default)]
struct PyProject {
    #[serde(default)]
    project: Option<ProjectTable>,
}

#[derive(Debug, Deserialize, Default)]
struct ProjectTable {
    #[serde(default)]
    name: Option<String>,
}

/// Package name from `[project].name`, else the project directory's name.
pub fn package_name(project_dir: &Path) -> Result<String> {
    let path = project_dir.join(PYPROJECT);
    if path.is_file() {
        let data = fs::read_to_string(&path)?;
        let parsed: PyProject =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        if let Some(name) = parsed.project.and_then(|p| p.name).filter(|n| !n.trim().is_empty()) {
            return Ok(name.trim().to_string());
        }
    }
    project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("cannot derive a package name from {}", project_dir.display()))
}

/// Where the project declares its dependencies: pyproject.toml, or setup.py for older layouts.
pub fn dependency_source(project_dir: &Path) -> Option<PathBuf> {
    [PYPROJECT, SETUP_PY]
        .iter()
        .copied()
        .map(PathBuf::from)
        .find(|f| project_dir.join(f).is_file())
}

/// Package names from a pinned requirements file.
///
/// Only lines starting with an ASCII letter count (comments, `--hash` continuations and
/// option lines are skipped); of those, the first token is kept with any extras,
/// version specifier or environment marker cut off.
pub fn requirement_names(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_alphabetic()))
        .filter_map(|l| l.split_whitespace().next())
        .filter_map(|token| {
            token
                .split(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.')))
                .next()
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        })
        .collect()
}
