//! Listening-socket enumeration with platform-specific implementations.

#[cfg(target_os = "macos")]
mod darwin;

#[cfg(target_os = "linux")]
mod linux;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A raw listening-socket row: the triple the socket listing reports before
/// per-process details are attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawListener {
    pub pid: u32,
    pub name: String,
    pub endpoint: String,
}

/// Trait for platform-specific socket enumeration implementations.
pub trait Scanner: Send + Sync {
    /// Enumerate all TCP listening sockets.
    fn scan(&self) -> impl std::future::Future<Output = Result<Vec<RawListener>>> + Send;
}

/// Name of the platform utility used for socket enumeration.
pub fn required_tool() -> &'static str {
    if cfg!(target_os = "macos") {
        "lsof"
    } else {
        "ss"
    }
}

/// The main socket scanner that uses platform-specific implementations.
pub struct ListenerScanner {
    #[cfg(target_os = "macos")]
    inner: darwin::DarwinScanner,

    #[cfg(target_os = "linux")]
    inner: linux::LinuxScanner,
}

impl ListenerScanner {
    /// Create a new scanner for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "macos")]
            inner: darwin::DarwinScanner::new(),

            #[cfg(target_os = "linux")]
            inner: linux::LinuxScanner::new(),
        }
    }

    /// Enumerate all TCP listening sockets.
    pub async fn scan(&self) -> Result<Vec<RawListener>> {
        self.inner.scan().await
    }
}

impl Default for ListenerScanner {
    fn default() -> Self {
        Self::new()
    }
}
