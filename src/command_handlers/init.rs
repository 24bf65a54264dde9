use crate::command_handlers::PreconditionError;
use crate::process::CallPolicy;
use crate::project::{DEV_REQUIREMENTS, REQUIREMENTS};
use crate::registry::command;
use anyhow::Result;
use tracing::info;

command! {
    /// Create the virtualenv and install pinned requirements plus the project in editable mode.
    pub fn init(ctx: &Context) -> Result<()> {
        let requirements = ctx.project_path(REQUIREMENTS);
        if !requirements.is_file() {
            return Err(PreconditionError::MissingRequirements(requirements).into());
        }
        let python = ctx.config.interpreter()?;
        info!(venv = %ctx.config.venv.display(), "creating virtualenv");
        ctx.run(
            ctx.command(python).args(["-m", "venv"]).arg(&ctx.config.venv),
            CallPolicy::FailFast,
        )?;
        if ctx.project_path(DEV_REQUIREMENTS).is_file() {
            ctx.run(ctx.pip_install().args(["-r", DEV_REQUIREMENTS]), CallPolicy::FailFast)?;
        }
        ctx.run(ctx.pip_install().args(["-r", REQUIREMENTS]), CallPolicy::FailFast)?;
        ctx.run(ctx.pip_install().args(["-e", "."]), CallPolicy::FailFast)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_handlers::testing::{project, RecordingRunner};
    use crate::command_handlers::Context;

    #[test]
    fn missing_requirements_fails_before_any_subprocess() {
        let (_tmp, cfg) = project();
        let runner = RecordingRunner::default();
        let err = init(&Context::new(&cfg, &runner)).unwrap_err();
        assert!(err.to_string().contains("requirements.txt"), "{err}");
        assert_eq!(
            err.downcast_ref::<PreconditionError>(),
            Some(&PreconditionError::MissingRequirements(cfg.project_dir.join("requirements.txt")))
        );
        assert!(runner.lines().is_empty());
    }

    #[test]
    fn installs_dev_then_pinned_then_editable() {
        let (_tmp, cfg) = project();
        std::fs::write(cfg.project_dir.join("requirements.txt"), "").unwrap();
        std::fs::write(cfg.project_dir.join("dev-requirements.txt"), "").unwrap();
        let runner = RecordingRunner::default();
        init(&Context::new(&cfg, &runner)).unwrap();
        let venv = cfg.venv.to_string_lossy().into_owned();
        assert_eq!(
            runner.lines(),
            vec![
                format!("python3 -m venv {venv}"),
                "pip install -r dev-requirements.txt".to_string(),
                "pip install -r requirements.txt".to_string(),
                "pip install -e .".to_string(),
            ]
        );
        assert!(runner.policies().iter().all(|p| *p == CallPolicy::FailFast));
        let calls = runner.calls.borrow();
        assert!(calls.iter().all(|(inv, _)| inv.cwd == cfg.project_dir));
        assert!(calls[1].0.program.starts_with(&cfg.venv));
    }

    #[test]
    fn dev_requirements_are_optional() {
        let (_tmp, cfg) = project();
        std::fs::write(cfg.project_dir.join("requirements.txt"), "").unwrap();
        let runner = RecordingRunner::default();
        init(&Context::new(&cfg, &runner)).unwrap();
        assert_eq!(runner.lines().len(), 3);
        assert!(!runner.lines().iter().any(|l| l.contains("dev-requirements")));
    }

    #[test]
    fn stops_at_first_failure() {
        let (_tmp, cfg) = project();
        std::fs::write(cfg.project_dir.join("requirements.txt"), "").unwrap();
        let runner = RecordingRunner::failing("python3");
        assert!(init(&Context::new(&cfg, &runner)).is_err());
        assert_eq!(runner.lines().len(), 1);
    }
}
