//! Runtime process record with derived classification.

use serde::{Deserialize, Serialize};

/// Closed classification for runtime processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ProcessKind {
    /// A process the operator actually cares about.
    #[default]
    Relevant,
    /// Editor, browser, and chat-app helpers and other background noise.
    System,
}

impl ProcessKind {
    /// Get the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProcessKind::Relevant => "Relevant",
            ProcessKind::System => "System",
        }
    }
}

impl std::fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A row from the process-listing utility, classified by its command line.
///
/// `kind` is derived by the keyword policy, never set directly;
/// reclassification only happens by re-running the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeProcess {
    /// Username of the process owner.
    pub user: String,

    /// Process ID.
    pub pid: u32,

    /// CPU usage percentage as reported by the listing.
    pub cpu_percent: f32,

    /// Memory usage percentage as reported by the listing.
    pub mem_percent: f32,

    /// Virtual memory size in KB.
    pub vsz_kb: u64,

    /// Resident set size in KB.
    pub rss_kb: u64,

    /// Full command line.
    pub command: String,

    /// Derived classification.
    pub kind: ProcessKind,
}

impl RuntimeProcess {
    /// Resident memory formatted for display.
    pub fn formatted_memory(&self) -> String {
        crate::format::format_memory(self.rss_kb)
    }
}
