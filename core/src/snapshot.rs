//! Snapshot capture: compose the fact sources into normalized record sets.
//!
//! Every capture is a point-in-time rebuild; nothing is cached between
//! calls. Failures degrade (empty or zeroed results plus a diagnostic on
//! the console) instead of propagating.

use tracing::warn;

use crate::details::DetailSource;
use crate::memstats;
use crate::models::{ListenerProcess, RuntimeProcess, SystemMemory};
use crate::rank;
use crate::runtime::RuntimeScanner;
use crate::scanner::{self, ListenerScanner};
use crate::session::{Console, StatusKind};

/// Capture the listening-socket snapshot, sorted by resident memory
/// descending.
///
/// Enumeration failure degrades to an empty snapshot; a failed detail
/// lookup degrades that one record to the sentinels, never drops it.
pub async fn capture_listeners<C: Console>(console: &mut C) -> Vec<ListenerProcess> {
    let scanner = ListenerScanner::new();
    let raw = match scanner.scan().await {
        Ok(raw) => raw,
        Err(error) => {
            warn!(%error, "listening-socket enumeration failed");
            console.status(
                StatusKind::Error,
                &format!("Error running {}: {}", scanner::required_tool(), error),
            );
            return Vec::new();
        }
    };

    let details = DetailSource::new();
    let mut listeners = Vec::with_capacity(raw.len());
    for row in raw {
        let detail = details.lookup(row.pid).await;
        listeners.push(ListenerProcess {
            pid: row.pid,
            name: row.name,
            endpoint: row.endpoint,
            memory_kb: detail.rss_kb,
            command: detail.command,
        });
    }

    rank::sort_by_memory_desc(&mut listeners);
    listeners
}

/// Capture the runtime process snapshot, sorted by resident memory
/// descending. Failure degrades to an empty set.
pub async fn capture_runtime<C: Console>(
    console: &mut C,
    scanner: &RuntimeScanner,
) -> Vec<RuntimeProcess> {
    match scanner.scan().await {
        Ok(mut processes) => {
            rank::sort_by_memory_desc(&mut processes);
            processes
        }
        Err(error) => {
            warn!(%error, "runtime process enumeration failed");
            console.status(StatusKind::Error, &format!("Error running ps: {}", error));
            Vec::new()
        }
    }
}

/// Capture the aggregate system memory snapshot. Failure degrades to a
/// zeroed snapshot.
pub async fn capture_system_memory<C: Console>(console: &mut C) -> SystemMemory {
    match memstats::read_system_memory().await {
        Ok(memory) => memory,
        Err(error) => {
            warn!(%error, "system memory statistics unavailable");
            console.status(
                StatusKind::Error,
                &format!("Error reading memory statistics: {}", error),
            );
            SystemMemory::default()
        }
    }
}
