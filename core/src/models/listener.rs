//! Listening-socket process record.

use serde::{Deserialize, Serialize};

/// A process holding a TCP listening socket.
///
/// One record per `(pid, endpoint)` pair within a snapshot. The same PID
/// legitimately appears once per distinct listening endpoint, never twice
/// for the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerProcess {
    /// Process ID. Platform-scoped; a PID can be reused after process exit.
    pub pid: u32,

    /// Short process name as reported by the socket listing (may be
    /// truncated or generic).
    pub name: String,

    /// Bound address:port string, kept verbatim from the source
    /// (e.g. "*:3000", "127.0.0.1:8080", "[::1]:5432").
    pub endpoint: String,

    /// Resident memory in KB at observation time. 0 means the lookup could
    /// not determine it, not an error.
    pub memory_kb: u64,

    /// Best-effort full command line.
    pub command: String,
}

impl ListenerProcess {
    /// Resident memory formatted for display.
    pub fn formatted_memory(&self) -> String {
        crate::format::format_memory(self.memory_kb)
    }
}

impl std::fmt::Display for ListenerProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (PID: {}, Port: {})", self.name, self.pid, self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ListenerProcess {
        ListenerProcess {
            pid: 1234,
            name: "node".to_string(),
            endpoint: "*:3000".to_string(),
            memory_kb: 2048,
            command: "node server.js".to_string(),
        }
    }

    #[test]
    fn test_formatted_memory() {
        assert_eq!(sample().formatted_memory(), "2.0 MB");
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "node (PID: 1234, Port: *:3000)");
    }
}
