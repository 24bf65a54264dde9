use crate::command_handlers::lock;
use crate::process::CallPolicy;
use crate::project::{package_name, requirement_names, DIST_DIR, REQUIREMENTS};
use crate::registry::command;
use anyhow::Result;
use fs_err as fs;
use std::path::Path;
use tracing::info;

command! {
    /// Lock, then bundle the project and its requirements into one pex executable.
    pub fn bundle(ctx: &Context) -> Result<()> {
        lock::lock(ctx)?;
        let names = requirement_names(&fs::read_to_string(ctx.project_path(REQUIREMENTS))?);
        let package = package_name(&ctx.config.project_dir)?;
        let output = Path::new(DIST_DIR).join(&package);
        info!(%package, requirements = names.len(), output = %output.display(), "bundling");
        ctx.run(
            ctx.command(ctx.venv_tool("pex"))
                .arg(".")
                .args(&names)
                .args(["--disable-cache", "--script", package.as_str(), "--output-file"])
                .arg(&output),
            ctx.config.bundle_policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_handlers::testing::{project, RecordingRunner};
    use crate::command_handlers::Context;

    fn prepared() -> (tempfile::TempDir, crate::config::Config) {
        let (tmp, cfg) = project();
        std::fs::write(cfg.project_dir.join("pyproject.toml"), "[project]\nname = \"acme\"\n").unwrap();
        std::fs::write(
            cfg.project_dir.join("requirements.txt"),
            "foo==1.0 \\\n    --hash=sha256:aa\n  # via acme\nbar==2.0 \\\n    --hash=sha256:bb\n",
        )
        .unwrap();
        (tmp, cfg)
    }

    #[test]
    fn locks_then_bundles_named_requirements() {
        let (_tmp, cfg) = prepared();
        let runner = RecordingRunner::default();
        bundle(&Context::new(&cfg, &runner)).unwrap();
        let lines = runner.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "pip install pip-tools");
        assert!(lines[1].starts_with("pip-compile"));
        assert_eq!(
            lines[2],
            format!(
                "pex . foo bar --disable-cache --script acme --output-file {}",
                Path::new("dist").join("acme").display()
            )
        );
        assert_eq!(runner.policies()[2], CallPolicy::BestEffort);
    }

    #[test]
    fn bundler_failure_follows_configured_policy() {
        let (_tmp, mut cfg) = prepared();
        let runner = RecordingRunner::failing("pex");
        bundle(&Context::new(&cfg, &runner)).unwrap();

        cfg.bundle_policy = CallPolicy::FailFast;
        let runner = RecordingRunner::failing("pex");
        assert!(bundle(&Context::new(&cfg, &runner)).is_err());
    }

    #[test]
    fn lock_failure_stops_bundling() {
        let (_tmp, cfg) = prepared();
        let runner = RecordingRunner::failing("pip-compile");
        assert!(bundle(&Context::new(&cfg, &runner)).is_err());
        assert!(!runner.lines().iter().any(|l| l.starts_with("pex")));
    }
}
