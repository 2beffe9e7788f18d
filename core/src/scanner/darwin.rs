//! macOS socket enumeration using lsof.

use std::collections::HashSet;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

use super::{RawListener, Scanner};

/// macOS-specific scanner using lsof.
pub struct DarwinScanner;

impl DarwinScanner {
    /// Create a new macOS scanner.
    pub fn new() -> Self {
        Self
    }

    /// Parse lsof output into raw listener rows.
    ///
    /// Expected lsof output format:
    /// ```text
    /// COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
    /// node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
    /// ```
    ///
    /// Rows with fewer than ten columns are skipped; the same `(pid,
    /// endpoint)` pair is emitted once, first occurrence wins. The listing
    /// reports multiplexed sockets more than once, so duplicates are
    /// expected.
    fn parse_lsof_output(&self, output: &str) -> Vec<RawListener> {
        let mut listeners = Vec::new();
        let mut seen: HashSet<(u32, String)> = HashSet::new();

        // Skip header line
        for line in output.lines().skip(1) {
            if line.is_empty() {
                continue;
            }

            // Parse lsof columns: COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME (LISTEN)
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 10 {
                continue;
            }

            // Extract and unescape process name
            let name = components[0]
                .replace("\\x20", " ") // Space
                .replace("\\x2f", "/"); // Slash

            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            let endpoint = components[8].to_string();

            if !seen.insert((pid, endpoint.clone())) {
                continue;
            }

            listeners.push(RawListener {
                pid,
                name,
                endpoint,
            });
        }

        debug!(count = listeners.len(), "parsed lsof listener rows");
        listeners
    }
}

impl Default for DarwinScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for DarwinScanner {
    /// Enumerate listening TCP sockets using lsof.
    ///
    /// Executes: `lsof -iTCP -sTCP:LISTEN -P -n`
    ///
    /// Flags explained:
    /// - -iTCP: Show only TCP connections
    /// - -sTCP:LISTEN: Show only listening sockets
    /// - -P: Show port numbers (don't resolve to service names)
    /// - -n: Show IP addresses (don't resolve to hostnames)
    async fn scan(&self) -> Result<Vec<RawListener>> {
        let output = Command::new("lsof")
            .args(["-iTCP", "-sTCP:LISTEN", "-P", "-n"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run lsof: {}", e)))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "lsof exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in lsof output: {}", e)))?;

        Ok(self.parse_lsof_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lsof_output() {
        let scanner = DarwinScanner::new();

        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
nginx        1  root    6u  IPv4 0x1234567890abcdef      0t0  TCP *:80 (LISTEN)
"#;

        let listeners = scanner.parse_lsof_output(output);
        assert_eq!(listeners.len(), 2);

        assert_eq!(listeners[0].pid, 34805);
        assert_eq!(listeners[0].name, "node");
        assert_eq!(listeners[0].endpoint, "[::1]:3000");

        assert_eq!(listeners[1].pid, 1);
        assert_eq!(listeners[1].name, "nginx");
        assert_eq!(listeners[1].endpoint, "*:80");
    }

    #[test]
    fn test_unescape_process_name() {
        let scanner = DarwinScanner::new();

        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
Code\x20Helper  1234  user   10u  IPv4 0x1234567890abcdef      0t0  TCP *:3000 (LISTEN)
"#;

        let listeners = scanner.parse_lsof_output(output);
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].name, "Code Helper");
    }

    #[test]
    fn test_duplicate_pid_endpoint_keeps_first() {
        let scanner = DarwinScanner::new();

        // Same (pid, endpoint) with a differing name column: first wins.
        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node     1234  code   19u  IPv4 0x1234567890abcdef      0t0  TCP 127.0.0.1:3000 (LISTEN)
node-alt 1234  code   20u  IPv4 0xfedcba0987654321      0t0  TCP 127.0.0.1:3000 (LISTEN)
"#;

        let listeners = scanner.parse_lsof_output(output);
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].name, "node");
    }

    #[test]
    fn test_same_pid_distinct_endpoints_kept() {
        let scanner = DarwinScanner::new();

        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node     1234  code   19u  IPv4 0x1234567890abcdef      0t0  TCP 127.0.0.1:3000 (LISTEN)
node     1234  code   20u  IPv6 0xfedcba0987654321      0t0  TCP [::1]:8080 (LISTEN)
"#;

        let listeners = scanner.parse_lsof_output(output);
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let scanner = DarwinScanner::new();

        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
truncated line with too few fields
nginx        1  root    6u  IPv4 0x1234567890abcdef      0t0  TCP *:80 (LISTEN)
node   notapid  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
"#;

        let listeners = scanner.parse_lsof_output(output);
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].name, "nginx");
    }
}
