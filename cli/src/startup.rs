//! Startup requirement validation.

use std::process::Stdio;

use tokio::process::Command;
use vampirehunter_core::scanner;

/// Verify the platform socket-enumeration utility is installed.
///
/// Returns the missing tool's name on failure. This is the only fatal
/// degradation: everything downstream degrades to empty results instead.
pub async fn check_required_tools() -> Result<(), &'static str> {
    let tool = scanner::required_tool();
    let found = Command::new("which")
        .arg(tool)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false);

    if found {
        Ok(())
    } else {
        Err(tool)
    }
}
