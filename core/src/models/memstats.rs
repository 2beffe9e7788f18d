//! Aggregate system memory snapshot.

use serde::{Deserialize, Serialize};

/// System-wide memory usage in MB.
///
/// Partial by design: any category the statistics source does not report
/// defaults to zero rather than failing the whole snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMemory {
    pub free_mb: u64,
    pub active_mb: u64,
    pub inactive_mb: u64,
    /// Kernel-reserved (wired-down) memory.
    pub wired_mb: u64,
    pub compressed_mb: u64,
}

impl SystemMemory {
    /// Total across the reported in-use categories.
    pub fn used_mb(&self) -> u64 {
        self.active_mb + self.inactive_mb + self.wired_mb + self.compressed_mb
    }
}
