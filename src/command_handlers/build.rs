use crate::process::CallPolicy;
use crate::project::DIST_DIR;
use crate::registry::command;
use anyhow::Result;

command! {
    /// Build the source distribution and wheel into dist/.
    pub fn build(ctx: &Context) -> Result<()> {
        ctx.run(
            ctx.command(ctx.venv_tool("python"))
                .args(["-m", "build", "--sdist", "--wheel", "--outdir", DIST_DIR]),
            CallPolicy::FailFast,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_handlers::testing::{project, RecordingRunner};
    use crate::command_handlers::Context;

    #[test]
    fn builds_sdist_and_wheel_with_venv_python() {
        let (_tmp, cfg) = project();
        let runner = RecordingRunner::default();
        build(&Context::new(&cfg, &runner)).unwrap();
        assert_eq!(runner.lines(), vec!["python -m build --sdist --wheel --outdir dist"]);
        assert_eq!(runner.policies(), vec![CallPolicy::FailFast]);
        assert!(runner.calls.borrow()[0].0.program.starts_with(&cfg.venv));
    }

    #[test]
    fn build_failure_propagates() {
        let (_tmp, cfg) = project();
        let runner = RecordingRunner::failing("python");
        let err = build(&Context::new(&cfg, &runner)).unwrap_err();
        assert!(err.to_string().contains("exited with status 1"), "{err}");
    }
}
