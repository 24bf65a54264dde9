use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// What to do when an external tool exits non-zero (or cannot be started).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallPolicy {
    #[default]
    FailFast,
    BestEffort,
}

impl CallPolicy {
    pub fn apply(self, outcome: Result<(), ProcessError>) -> Result<(), ProcessError> {
        match (outcome, self) {
            (Ok(()), _) => Ok(()),
            (Err(e), CallPolicy::FailFast) => Err(e),
            (Err(e), CallPolicy::BestEffort) => {
                warn!(error = %e, "best-effort step failed; continuing");
                Ok(())
            }
        }
    }
}

impl FromStr for CallPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "failfast" | "strict" => Ok(CallPolicy::FailFast),
            "best-effort" | "besteffort" | "lenient" => Ok(CallPolicy::BestEffort),
            other => anyhow::bail!("unknown call policy '{other}' (expected fail-fast or best-effort)"),
        }
    }
}

impl fmt::Display for CallPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallPolicy::FailFast => "fail-fast",
            CallPolicy::BestEffort => "best-effort",
        })
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}", describe_code(.code))]
    Failed { command: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: cwd.to_path_buf() }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Arguments as lossy strings, handy for assertions and logs.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for a in &self.args {
            let a = a.to_string_lossy();
            if a.is_empty() || a.contains(char::is_whitespace) {
                write!(f, " \"{a}\"")?;
            } else {
                write!(f, " {a}")?;
            }
        }
        Ok(())
    }
}

pub trait Runner {
    fn run(&self, invocation: &Invocation, policy: CallPolicy) -> Result<()>;
}

/// Runs commands for real, blocking until each exits, with inherited stdio.
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation, policy: CallPolicy) -> Result<()> {
        info!(command = %invocation, %policy, "running");
        let command = invocation.to_string();
        let outcome = match Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
        {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ProcessError::Failed { command, code: status.code() }),
            Err(source) => Err(ProcessError::Spawn { command, source }),
        };
        policy.apply(outcome)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> Result<(), ProcessError> {
        Err(ProcessError::Failed { command: "pip install twine".into(), code: Some(1) })
    }

    #[test]
    fn fail_fast_propagates_and_best_effort_swallows() {
        let err = CallPolicy::FailFast.apply(failed()).unwrap_err();
        assert_eq!(err.to_string(), "`pip install twine` exited with status 1");
        assert!(CallPolicy::BestEffort.apply(failed()).is_ok());
        assert!(CallPolicy::FailFast.apply(Ok(())).is_ok());
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Fail-Fast".parse::<CallPolicy>().unwrap(), CallPolicy::FailFast);
        assert_eq!(" best-effort ".parse::<CallPolicy>().unwrap(), CallPolicy::BestEffort);
        assert!("sometimes".parse::<CallPolicy>().is_err());
        assert_eq!(CallPolicy::BestEffort.to_string(), "best-effort");
    }

    #[test]
    fn invocation_renders_quoted_args() {
        let inv = Invocation::new("pip", Path::new("."))
            .args(["install", "-r"])
            .arg("my reqs.txt");
        assert_eq!(inv.to_string(), "pip install -r \"my reqs.txt\"");
        assert_eq!(inv.arg_strings(), vec!["install", "-r", "my reqs.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let ok = Invocation::new("sh", dir.path()).args(["-c", "exit 0"]);
        let bad = Invocation::new("sh", dir.path()).args(["-c", "exit 3"]);
        assert!(SystemRunner.run(&ok, CallPolicy::FailFast).is_ok());
        let err = SystemRunner.run(&bad, CallPolicy::FailFast).unwrap_err();
        assert!(err.to_string().contains("status 3"), "{err}");
        assert!(SystemRunner.run(&bad, CallPolicy::BestEffort).is_ok());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("definitely-not-a-real-tool-xyz", dir.path());
        let err = SystemRunner.run(&inv, CallPolicy::FailFast).unwrap_err();
        assert!(err.to_string().starts_with("failed to start"), "{err}");
    }
}
