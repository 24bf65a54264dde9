use crate::command_handlers::PreconditionError;
use crate::process::CallPolicy;
use crate::project::DIST_DIR;
use crate::registry::command;
use anyhow::Result;
use fs_err as fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

command! {
    /// Upload everything in dist/ with twine.
    pub fn upload(ctx: &Context) -> Result<()> {
        let dist = ctx.project_path(DIST_DIR);
        let files = distributions(&dist)?;
        if files.is_empty() {
            return Err(PreconditionError::NothingToUpload(dist).into());
        }
        ctx.run(ctx.pip_install().arg("twine"), CallPolicy::BestEffort)?;
        ctx.run(
            ctx.command(ctx.venv_tool("twine")).arg("upload").args(&files),
            CallPolicy::FailFast,
        )
    }
}

/// Regular files directly inside `dist`, sorted by name.
fn distributions(dist: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dist) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
