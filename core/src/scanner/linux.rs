//! Linux socket enumeration using ss.

use std::collections::HashSet;
use std::process::Stdio;

use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

use super::{RawListener, Scanner};

/// Linux-specific scanner using ss.
pub struct LinuxScanner;

impl LinuxScanner {
    /// Create a new Linux scanner.
    pub fn new() -> Self {
        Self
    }

    /// Parse ss output into raw listener rows.
    ///
    /// Expected ss output format (no header, `-H`):
    /// ```text
    /// LISTEN     0          4096           [::ffff:127.0.0.1]:63342    *:*    users:(("rustrover",pid=53561,fd=54))
    /// ```
    ///
    /// Rows without a process column, with too few fields, or repeating an
    /// already-seen `(pid, endpoint)` pair are skipped.
    fn parse_ss_output(&self, output: &str) -> Vec<RawListener> {
        let mut listeners = Vec::new();
        let mut seen: HashSet<(u32, String)> = HashSet::new();

        let process_re = Regex::new(r#"users:\(\("(.+?)",pid=(\d+),fd=\d+\)"#)
            .expect("static regex");

        for line in output.lines() {
            if line.is_empty() {
                continue;
            }

            // Parse columns: [State] [Recv-Q] [Send-Q] [Local Address:Port] [Peer Address:Port] [Process]
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 6 {
                continue;
            }

            let Some(caps) = process_re.captures(components[5]) else {
                continue;
            };

            let name = caps[1].to_string();

            let pid: u32 = match caps[2].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            let endpoint = components[3].to_string();

            if !seen.insert((pid, endpoint.clone())) {
                continue;
            }

            listeners.push(RawListener {
                pid,
                name,
                endpoint,
            });
        }

        debug!(count = listeners.len(), "parsed ss listener rows");
        listeners
    }
}

impl Default for LinuxScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for LinuxScanner {
    /// Enumerate listening TCP sockets.
    ///
    /// Executes: `ss -Htlnp`
    ///
    /// Flags explained:
    /// -H, --no-header     Suppress header line
    /// -t, --tcp           display only TCP sockets
    /// -l, --listening     display listening sockets
    /// -n, --numeric       don't resolve service names
    /// -p, --processes     show process using socket
    async fn scan(&self) -> Result<Vec<RawListener>> {
        let output = Command::new("ss")
            .args(["-Htlnp"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run ss: {}", e)))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "ss exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ss output: {}", e)))?;

        Ok(self.parse_ss_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ss_output() {
        let scanner = LinuxScanner::new();

        let output = r#"LISTEN 0 4096 [::ffff:127.0.0.1]:80 *:* users:(("nginx",pid=55316,fd=6))
LISTEN 0 50 127.0.0.1:3000 *:* users:(("node",pid=53561,fd=187))"#;

        let listeners = scanner.parse_ss_output(output);
        assert_eq!(listeners.len(), 2);

        assert_eq!(listeners[0].pid, 55316);
        assert_eq!(listeners[0].name, "nginx");
        assert_eq!(listeners[0].endpoint, "[::ffff:127.0.0.1]:80");

        assert_eq!(listeners[1].pid, 53561);
        assert_eq!(listeners[1].name, "node");
        assert_eq!(listeners[1].endpoint, "127.0.0.1:3000");
    }

    #[test]
    fn test_duplicate_pid_endpoint_keeps_first() {
        let scanner = LinuxScanner::new();

        // Same (pid, endpoint) reported twice with differing names: first wins.
        let output = r#"LISTEN 0 4096 127.0.0.1:3000 *:* users:(("code",pid=1234,fd=54))
LISTEN 0 4096 127.0.0.1:3000 *:* users:(("code-alt",pid=1234,fd=55))"#;

        let listeners = scanner.parse_ss_output(output);
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].name, "code");
    }

    #[test]
    fn test_same_pid_distinct_endpoints_kept() {
        let scanner = LinuxScanner::new();

        let output = r#"LISTEN 0 4096 127.0.0.1:3000 *:* users:(("node",pid=1234,fd=54))
LISTEN 0 4096 [::1]:8080 *:* users:(("node",pid=1234,fd=55))"#;

        let listeners = scanner.parse_ss_output(output);
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let scanner = LinuxScanner::new();

        let output = r#"LISTEN 0 4096
LISTEN 0 4096 127.0.0.1:631 *:*
LISTEN 0 50 127.0.0.1:3000 *:* users:(("node",pid=53561,fd=187))"#;

        let listeners = scanner.parse_ss_output(output);
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].name, "node");
    }
}
