mod download;
mod probe;

pub use download::download_format;
pub use probe::{FormatOption, probe_formats};

use std::path::Path;

use tokio::process;

/// Cookie jar picked up from the working directory when present; absence is
/// silently tolerated.
const COOKIES_FILE: &str = "cookies.txt";

fn base_command() -> process::Command {
    let mut cmd = process::Command::new("yt-dlp");
    cmd.arg("--no-warnings");
    if Path::new(COOKIES_FILE).exists() {
        cmd.args(["--cookies", COOKIES_FILE]);
    }
    cmd
}
