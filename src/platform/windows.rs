use crate::platform::PlatformOps;

pub static WINDOWS_PLATFORM: Windows = Windows;

pub struct Windows;

impl PlatformOps for Windows {
    fn scripts_dir_name(&self) -> &'static str { "Scripts" }
    fn final_binary_name(&self, base: &str) -> String { if base.ends_with(".exe") { base.to_string() } else { format!("{base}.exe") } }
}
