//! Per-process memory and command lookup with a two-tier fallback.
//!
//! The primary path queries the process table through a structured handle
//! API. When a single process cannot be resolved there (vanished, permission
//! denied), a textual `ps` lookup for that one PID takes over. If both paths
//! fail the record still gets emitted with the zero/placeholder sentinels;
//! a lookup failure for one process never aborts the snapshot.

use std::process::Stdio;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::process::Command;
use tracing::debug;

/// Placeholder command when neither lookup path can describe a process.
pub const DETAILS_UNAVAILABLE: &str = "Details unavailable";

/// Resident memory and command line for a single process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDetails {
    /// Resident set size in KB (0 = unknown).
    pub rss_kb: u64,
    /// Full command line, or the fixed placeholder.
    pub command: String,
}

impl ProcessDetails {
    fn unavailable() -> Self {
        Self {
            rss_kb: 0,
            command: DETAILS_UNAVAILABLE.to_string(),
        }
    }
}

/// Detail source backed by one process-table refresh per snapshot.
pub struct DetailSource {
    system: System,
}

impl DetailSource {
    /// Snapshot the process table once; all lookups run against it.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        Self { system }
    }

    /// Look up details for one PID. Never fails: falls back to `ps`, then to
    /// the sentinels.
    pub async fn lookup(&self, pid: u32) -> ProcessDetails {
        if let Some(process) = self.system.process(Pid::from_u32(pid)) {
            let command = process
                .cmd()
                .iter()
                .map(|part| part.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ");
            if !command.is_empty() {
                return ProcessDetails {
                    rss_kb: process.memory() / 1024,
                    command,
                };
            }
        }

        debug!(pid = pid, "process handle lookup missed, falling back to ps");
        match self.lookup_via_ps(pid).await {
            Some(details) => details,
            None => ProcessDetails::unavailable(),
        }
    }

    /// Textual fallback: `ps -o rss=,command= -p PID`.
    async fn lookup_via_ps(&self, pid: u32) -> Option<ProcessDetails> {
        let output = Command::new("ps")
            .args(["-o", "rss=,command=", "-p", &pid.to_string()])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8(output.stdout).ok()?;
        parse_ps_detail(stdout.lines().next()?)
    }
}

impl Default for DetailSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one `ps -o rss=,command=` row into details.
fn parse_ps_detail(line: &str) -> Option<ProcessDetails> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let rss_kb: u64 = parts.next()?.trim().parse().ok()?;
    let command = parts
        .next()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DETAILS_UNAVAILABLE)
        .to_string();
    Some(ProcessDetails { rss_kb, command })
}
