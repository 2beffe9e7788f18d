//! Runtime-process enumeration via the process-listing utility.
//!
//! Scans the full `ps aux` table for commands mentioning a runtime marker
//! (Node.js by default) and classifies each hit with the keyword policy.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::classify::KindPolicy;
use crate::error::{Error, Result};
use crate::models::RuntimeProcess;

/// Scanner for a specific runtime's processes.
pub struct RuntimeScanner {
    marker: String,
    policy: KindPolicy,
}

impl RuntimeScanner {
    /// Create a scanner for commands containing `marker`, classified by
    /// `policy`.
    pub fn new(marker: impl Into<String>, policy: KindPolicy) -> Self {
        Self {
            marker: marker.into().to_lowercase(),
            policy,
        }
    }

    /// Enumerate matching processes.
    ///
    /// Executes: `ps aux`
    pub async fn scan(&self) -> Result<Vec<RuntimeProcess>> {
        let output = Command::new("ps")
            .arg("aux")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run ps: {}", e)))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "ps exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ps output: {}", e)))?;

        Ok(self.parse_ps_aux(&stdout))
    }

    /// Parse `ps aux` rows into runtime process records.
    ///
    /// Expected column layout:
    /// ```text
    /// USER  PID  %CPU  %MEM  VSZ  RSS  TTY  STAT  START  TIME  COMMAND
    /// ```
    ///
    /// Rows with fewer than eleven columns or unparseable numeric fields are
    /// skipped; rows whose command does not mention the marker are ignored.
    fn parse_ps_aux(&self, output: &str) -> Vec<RuntimeProcess> {
        let mut processes = Vec::new();

        // Skip header line
        for line in output.lines().skip(1) {
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 11 {
                continue;
            }

            let command = components[10..].join(" ");
            if !command.to_lowercase().contains(&self.marker) {
                continue;
            }

            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };
            let cpu_percent: f32 = match components[2].parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let mem_percent: f32 = match components[3].parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let vsz_kb: u64 = components[4].parse().unwrap_or(0);
            let rss_kb: u64 = components[5].parse().unwrap_or(0);

            let kind = self.policy.classify(&command);

            processes.push(RuntimeProcess {
                user: components[0].to_string(),
                pid,
                cpu_percent,
                mem_percent,
                vsz_kb,
                rss_kb,
                command,
                kind,
            });
        }

        debug!(
            count = processes.len(),
            marker = %self.marker,
            "parsed runtime process rows"
        );
        processes
    }
}

impl Default for RuntimeScanner {
    fn default() -> Self {
        Self::new("node", KindPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessKind;

    const SAMPLE: &str = "\
USER               PID  %CPU %MEM      VSZ    RSS   TT  STAT STARTED      TIME COMMAND
dev              41234  12.3  2.1  4812340 345678   ??  S    10:05AM   1:23.45 node /srv/app/server.js
dev              41567   0.0  0.5  4098760  81234   ??  S    10:06AM   0:04.12 /Applications/Slack.app/Contents/Frameworks/Slack Helper.app node-service
dev              41890   1.2  0.9  4203450 145678   ??  S    10:07AM   0:12.00 node /usr/local/lib/node_modules/npm/bin/npm-cli.js run dev
root               123   0.0  0.1  4012345  10240   ??  Ss   09:00AM   0:01.00 /usr/libexec/syslogd
malformed row
";

    #[test]
    fn test_parse_filters_by_marker() {
        let scanner = RuntimeScanner::default();
        let processes = scanner.parse_ps_aux(SAMPLE);

        // syslogd does not mention the marker; the malformed row is dropped.
        assert_eq!(processes.len(), 3);
        assert_eq!(processes[0].pid, 41234);
        assert_eq!(processes[0].user, "dev");
        assert_eq!(processes[0].rss_kb, 345_678);
        assert_eq!(processes[0].command, "node /srv/app/server.js");
    }

    #[test]
    fn test_parse_applies_classification() {
        let scanner = RuntimeScanner::default();
        let processes = scanner.parse_ps_aux(SAMPLE);

        assert_eq!(processes[0].kind, ProcessKind::Relevant);
        // Slack helper is excluded by policy.
        assert_eq!(processes[1].kind, ProcessKind::System);
        assert_eq!(processes[2].kind, ProcessKind::Relevant);
    }

    #[test]
    fn test_malformed_rows_do_not_affect_others() {
        let scanner = RuntimeScanner::default();
        let with_noise = format!("{}\ndev notapid x y z node\n", SAMPLE);
        let processes = scanner.parse_ps_aux(&with_noise);
        assert_eq!(processes.len(), 3);
    }

    #[test]
    fn test_custom_marker() {
        let scanner = RuntimeScanner::new("syslogd", KindPolicy::default());
        let processes = scanner.parse_ps_aux(SAMPLE);
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].pid, 123);
    }
}
