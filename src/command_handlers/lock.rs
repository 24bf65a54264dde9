use crate::command_handlers::PreconditionError;
use crate::process::CallPolicy;
use crate::project::{dependency_source, DEV_REQUIREMENTS, DEV_REQUIREMENTS_IN, REQUIREMENTS};
use crate::registry::command;
use anyhow::Result;

command! {
    /// Compile hashed, pinned requirements.txt (and dev-requirements.txt) with pip-tools.
    pub fn lock(ctx: &Context) -> Result<()> {
        let Some(source) = dependency_source(&ctx.config.project_dir) else {
            return Err(PreconditionError::NoDependencySource(ctx.config.project_dir.clone()).into());
        };
        ctx.run(ctx.pip_install().arg("pip-tools"), CallPolicy::FailFast)?;
        ctx.run(
            ctx.command(ctx.venv_tool("pip-compile"))
                .args(["--generate-hashes", "--output-file", REQUIREMENTS])
                .arg(&source),
            CallPolicy::FailFast,
        )?;
        if ctx.project_path(DEV_REQUIREMENTS_IN).is_file() {
            ctx.run(
                ctx.command(ctx.venv_tool("pip-compile"))
                    .args(["--generate-hashes", "--output-file", DEV_REQUIREMENTS])
                    .arg(&source)
                    .arg(DEV_REQUIREMENTS_IN),
                CallPolicy::FailFast,
            )?;
        }
        Ok(())
    }
}
