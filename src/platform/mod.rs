pub fn platform() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

use std::path::{Path, PathBuf};

pub trait PlatformOps: Sync + Send {
    /// Directory inside a virtual environment that holds its executables.
    fn scripts_dir_name(&self) -> &'static str;
    fn final_binary_name(&self, base: &str) -> String;

    fn venv_executable(&self, venv: &Path, base: &str) -> PathBuf {
        venv.join(self.scripts_dir_name()).join(self.final_binary_name(base))
    }
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;
