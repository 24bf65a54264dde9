use crate::platform::PlatformOps;

pub static UNIX_PLATFORM: Unix = Unix;

pub struct Unix;

impl PlatformOps for Unix {
    fn scripts_dir_name(&self) -> &'static str {
        "bin"
    }
    fn final_binary_name(&self, base: &str) -> String {
        base.to_string()
    }
}
