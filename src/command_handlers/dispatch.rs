use crate::command_handlers::Context;
use crate::config::Config;
use crate::process::Runner;
use crate::registry::Registry;
use anyhow::Result;
use tracing::info;

pub fn dispatch(registry: &Registry, command: &str, cfg: &Config, runner: &dyn Runner) -> Result<()> {
    let Some(handler) = registry.lookup(command) else {
        anyhow::bail!("unknown command '{command}'");
    };
    info!(%command, venv = %cfg.venv.display(), "dispatching");
    (handler.run)(&Context::new(cfg, runner))
}
