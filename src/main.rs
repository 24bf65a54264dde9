use anyhow::{Context, Result};

use devflow::config::{self, Config};
use devflow::process::SystemRunner;
use devflow::{cli, command_handlers};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let registry = command_handlers::registry();
    let cwd = std::env::current_dir().context("reading current directory")?;
    let default_venv = config::default_venv(&cwd, |k| std::env::var_os(k));
    let args = cli::parse(&registry, &default_venv);
    let cfg = Config::resolve(cwd, args.venv, |k| std::env::var_os(k))?;
    command_handlers::dispatch::dispatch(&registry, &args.command, &cfg, &SystemRunner)?;
    Ok(())
}
