//! Process termination with a closed outcome type.
//!
//! The controller is stateless and makes no retry decisions; escalation
//! (retry with force) belongs to the interactive protocol.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::models::ListenerProcess;

/// Outcome of a termination attempt.
///
/// Expected failures are variants, not errors, so callers must handle each
/// case explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    /// Graceful termination signal delivered.
    Terminated,
    /// Forced kill signal delivered.
    ForceKilled,
    /// The process no longer exists.
    NotFound,
    /// The caller may not signal this process.
    PermissionDenied,
    /// Any other OS-level failure, with the underlying detail.
    Failed(String),
}

impl KillOutcome {
    /// Whether a signal was delivered.
    pub fn is_success(&self) -> bool {
        matches!(self, KillOutcome::Terminated | KillOutcome::ForceKilled)
    }
}

/// Interface for process termination.
///
/// Kept narrow so the session protocol can be exercised without touching
/// the OS process table.
pub trait Terminator {
    /// Send a termination signal: graceful by default, immediate when
    /// `force` is set.
    fn terminate(&self, pid: u32, force: bool) -> KillOutcome;
}

/// Signal-based terminator: SIGTERM, or SIGKILL when forced.
#[derive(Debug, Default)]
pub struct ProcessKiller;

impl ProcessKiller {
    /// Create a new process killer.
    pub fn new() -> Self {
        Self
    }
}

impl Terminator for ProcessKiller {
    fn terminate(&self, pid: u32, force: bool) -> KillOutcome {
        let signal = if force {
            Signal::SIGKILL
        } else {
            Signal::SIGTERM
        };

        debug!(pid = pid, signal = %signal, "sending termination signal");

        match kill(Pid::from_raw(pid as i32), signal) {
            Ok(()) if force => KillOutcome::ForceKilled,
            Ok(()) => KillOutcome::Terminated,
            Err(Errno::ESRCH) => {
                debug!(pid = pid, "process not found");
                KillOutcome::NotFound
            }
            Err(Errno::EPERM) => {
                warn!(pid = pid, "permission denied to signal process");
                KillOutcome::PermissionDenied
            }
            Err(errno) => KillOutcome::Failed(errno.to_string()),
        }
    }
}

/// Gracefully terminate every listener in the snapshot, continuing past
/// failures.
///
/// Returns each record's outcome in snapshot order; a failed termination
/// never aborts the remaining attempts.
pub fn kill_all<'a, T: Terminator>(
    terminator: &T,
    listeners: &'a [ListenerProcess],
) -> Vec<(&'a ListenerProcess, KillOutcome)> {
    listeners
        .iter()
        .map(|listener| (listener, terminator.terminate(listener.pid, false)))
        .collect()
}
