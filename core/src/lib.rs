//! VampireHunter Core Library
//!
//! Process discovery, classification, and lifecycle control for processes
//! holding TCP listening sockets ("vampire processes"). Provides
//! functionality to:
//! - Enumerate listening-socket processes with per-process resident memory
//!   and command lines (two-tier lookup with textual fallback)
//! - Rank and aggregate records by resource usage
//! - Classify runtime processes as relevant or noise via keyword policy
//! - Terminate processes with graceful/forced signals and a closed outcome
//!   type
//! - Drive the interactive decision protocol over an abstract console
//!
//! # Platform Support
//! - macOS: Uses `lsof`, `ps`, and `vm_stat` commands
//! - Linux: Uses `ss`, `ps`, and `/proc/meminfo`

pub mod classify;
pub mod details;
pub mod error;
pub mod format;
pub mod kill;
pub mod memstats;
pub mod models;
pub mod rank;
pub mod runtime;
pub mod scanner;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use classify::KindPolicy;
pub use details::{DetailSource, ProcessDetails, DETAILS_UNAVAILABLE};
pub use error::{Error, Result};
pub use format::format_memory;
pub use kill::{kill_all, KillOutcome, ProcessKiller, Terminator};
pub use models::{ListenerProcess, ProcessKind, RuntimeProcess, SystemMemory};
pub use runtime::RuntimeScanner;
pub use scanner::{ListenerScanner, RawListener, Scanner};
pub use session::{Choice, Console, Session, SessionOutcome, StatusKind};
