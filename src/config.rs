use crate::process::CallPolicy;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Explicit virtualenv path, as exported by an activated environment.
pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
/// Root directory holding named virtualenvs (virtualenvwrapper convention).
pub const WORKON_HOME: &str = "WORKON_HOME";
/// Policy for the bundler call: `fail-fast` or `best-effort`.
pub const BUNDLE_POLICY: &str = "DEVFLOW_BUNDLE_POLICY";
/// Interpreter used to create the virtualenv.
pub const PYTHON: &str = "DEVFLOW_PYTHON";

const DEFAULT_VENV_DIR: &str = "venv";

/// Everything a handler is allowed to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub venv: PathBuf,
    pub project_dir: PathBuf,
    pub python: Option<PathBuf>,
    pub bundle_policy: CallPolicy,
}

impl Config {
    /// Builds the configuration from the parsed `--venv` value and the environment.
    /// `env` returns `None` for unset variables.
    pub fn resolve<E>(project_dir: PathBuf, venv: Option<PathBuf>, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<OsString>,
    {
        let venv = match venv {
            Some(v) => project_dir.join(v),
            None => default_venv(&project_dir, &env),
        };
        let bundle_policy = match non_empty(&env, BUNDLE_POLICY) {
            Some(raw) => raw
                .to_string_lossy()
                .parse::<CallPolicy>()
                .with_context(|| format!("reading {BUNDLE_POLICY}"))?,
            None => CallPolicy::BestEffort,
        };
        let python = non_empty(&env, PYTHON).map(PathBuf::from);
        Ok(Config { venv, project_dir, python, bundle_policy })
    }

    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir.join(relative)
    }

    /// Interpreter for `python -m venv`: the override if set, else python3/python from PATH.
    pub fn interpreter(&self) -> Result<PathBuf> {
        if let Some(p) = &self.python {
            return Ok(p.clone());
        }
        which::which("python3")
            .or_else(|_| which::which("python"))
            .with_context(|| format!("no python interpreter on PATH (set {PYTHON} to choose one)"))
    }
}

/// Default virtualenv location. First match wins:
/// an existing `./venv` directory, `$VIRTUAL_ENV`, `$WORKON_HOME/<project dir name>`, `./venv`.
pub fn default_venv<E>(cwd: &Path, env: E) -> PathBuf
where
    E: Fn(&str) -> Option<OsString>,
{
    let local = cwd.join(DEFAULT_VENV_DIR);
    if local.is_dir() {
        return local;
    }
    if let Some(explicit) = non_empty(&env, VIRTUAL_ENV) {
        return PathBuf::from(explicit);
    }
    if let Some(root) = non_empty(&env, WORKON_HOME) {
        if let Some(name) = cwd.file_name() {
            return PathBuf::from(root).join(name);
        }
    }
    local
}

fn non_empty<E>(env: &E, key: &str) -> Option<OsString>
where
    E: Fn(&str) -> Option<OsString>,
{
    env(key).filter(|v| !v.is_empty())
}
