pub mod build;
pub mod bundle;
pub mod clean;
pub mod dispatch;
pub mod init;
pub mod lock;
pub mod upload;

use crate::config::Config;
use crate::platform::platform;
use crate::process::{CallPolicy, Invocation, Runner};
use crate::registry::Registry;
use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Builds the command table, in the order commands appear in `--help`.
pub fn registry() -> Registry {
    let mut builder = Registry::builder();
    builder.register(clean::HANDLER);
    builder.register(init::HANDLER);
    builder.register(lock::HANDLER);
    builder.register(build::HANDLER);
    builder.register(upload::HANDLER);
    builder.register(bundle::HANDLER);
    builder.build()
}

/// Conditions checked before any external tool is started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("{} not found; run `devflow lock` first", .0.display())]
    MissingRequirements(PathBuf),
    #[error("no pyproject.toml or setup.py in {}", .0.display())]
    NoDependencySource(PathBuf),
    #[error("no distributions in {}; run `devflow build` first", .0.display())]
    NothingToUpload(PathBuf),
}

/// What a handler gets: the resolved configuration and something to run tools with.
pub struct Context<'a> {
    pub config: &'a Config,
    pub runner: &'a dyn Runner,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn Runner) -> Self {
        Self { config, runner }
    }

    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.config.project_path(relative)
    }

    /// Executable inside the configured virtualenv.
    pub fn venv_tool(&self, name: &str) -> PathBuf {
        platform().venv_executable(&self.config.venv, name)
    }

    /// A command rooted at the project directory.
    pub fn command(&self, program: impl Into<PathBuf>) -> Invocation {
        Invocation::new(program, &self.config.project_dir)
    }

    pub fn pip_install(&self) -> Invocation {
        self.command(self.venv_tool("pip")).arg("install")
    }

    pub fn run(&self, invocation: Invocation, policy: CallPolicy) -> Result<()> {
        self.runner.run(&invocation, policy)
    }
}
