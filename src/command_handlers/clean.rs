use crate::project::{COVERAGE, DIST_DIR};
use crate::registry::command;
use anyhow::{Context as _, Result};
use fs_err as fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

command! {
    /// Remove the virtualenv, coverage data and build output.
    pub fn clean(ctx: &Context) -> Result<()> {
        remove_dir(&ctx.config.venv)?;
        remove_file(&ctx.project_path(COVERAGE))?;
        for shard in coverage_shards(&ctx.config.project_dir)? {
            remove_file(&shard)?;
        }
        remove_dir(&ctx.project_path(DIST_DIR))?;
        Ok(())
    }
}

/// `.coverage.*` files directly inside `dir`, matched on the file name alone.
fn coverage_shards(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = glob::Pattern::new(&format!("{COVERAGE}.*")).context("building coverage shard pattern")?;
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut shards = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        match name.to_str() {
            Some(n) if pattern.matches(n) => shards.push(entry.path()),
            Some(_) => {}
            None => debug!(name = ?name, "skipping non-UTF-8 file name"),
        }
    }
    Ok(shards)
}

fn remove_dir(path: &Path) -> Result<()> {
    ignore_missing(path, fs::remove_dir_all(path))
}

fn remove_file(path: &Path) -> Result<()> {
    ignore_missing(path, fs::remove_file(path))
}

fn ignore_missing(path: &Path, res: std::io::Result<()>) -> Result<()> {
    match res {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
