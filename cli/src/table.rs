//! Table rendering for snapshot record sets.
//!
//! Top-N truncation and relevance filtering live here: the core always
//! hands over the full sorted sets.

use vampirehunter_core::{
    format_memory, rank, ListenerProcess, ProcessKind, RuntimeProcess, StatusKind, SystemMemory,
};

use crate::ui;

/// How many runtime processes to show.
const RUNTIME_TOP_N: usize = 10;

/// Render the listener table with ID column and totals footer.
pub fn render_listeners(listeners: &[ListenerProcess]) {
    if listeners.is_empty() {
        ui::status(StatusKind::Success, "No server processes found");
        return;
    }

    println!(
        "{:<4} {:<8} {:<15} {:<15} {:<10} COMMAND",
        "ID", "PID", "NAME", "PORT", "MEMORY"
    );
    println!("{}", "-".repeat(105));

    for (index, listener) in listeners.iter().enumerate() {
        println!(
            "{:<4} {:<8} {:<15} {:<15} {:<10} {}",
            index + 1,
            listener.pid,
            clip(&listener.name, 15),
            clip(&listener.endpoint, 15),
            listener.formatted_memory(),
            ellipsize(&listener.command, 50),
        );
    }

    println!();
    ui::status(
        StatusKind::Info,
        &format!("Total processes: {}", listeners.len()),
    );
    let total_kb = rank::total_memory_kb(listeners);
    if total_kb > 0 {
        ui::status(
            StatusKind::Info,
            &format!("Total estimated memory usage: {}", format_memory(total_kb)),
        );
    }
}

/// Render the relevant runtime processes, truncated to the top N by
/// resident memory.
pub fn render_runtime(processes: &[RuntimeProcess]) {
    let relevant: Vec<&RuntimeProcess> = processes
        .iter()
        .filter(|process| process.kind == ProcessKind::Relevant)
        .collect();

    if relevant.is_empty() {
        ui::status(StatusKind::Success, "No runtime processes found");
        return;
    }

    println!();
    println!(
        "{:<8} {:<12} {:>6} {:>6} {:<10} COMMAND",
        "PID", "USER", "%CPU", "%MEM", "MEMORY"
    );
    println!("{}", "-".repeat(95));

    for process in relevant.iter().take(RUNTIME_TOP_N) {
        println!(
            "{:<8} {:<12} {:>6.1} {:>6.1} {:<10} {}",
            process.pid,
            clip(&process.user, 12),
            process.cpu_percent,
            process.mem_percent,
            process.formatted_memory(),
            ellipsize(&process.command, 50),
        );
    }

    println!();
    ui::status(
        StatusKind::Info,
        &format!(
            "Showing top {} of {} runtime processes",
            relevant.len().min(RUNTIME_TOP_N),
            relevant.len()
        ),
    );
    let total_kb: u64 = relevant.iter().map(|p| p.rss_kb).sum();
    if total_kb > 0 {
        ui::status(
            StatusKind::Info,
            &format!("Total runtime memory usage: {}", format_memory(total_kb)),
        );
    }
}

/// Render the aggregate system memory block.
pub fn render_system_memory(memory: &SystemMemory) {
    println!();
    ui::status(StatusKind::Highlight, "System memory statistics");
    println!("  Free:       {} MB", memory.free_mb);
    println!("  Active:     {} MB", memory.active_mb);
    println!("  Inactive:   {} MB", memory.inactive_mb);
    println!("  Wired:      {} MB", memory.wired_mb);
    println!("  Compressed: {} MB", memory.compressed_mb);
    println!("  Used total: {} MB", memory.used_mb());
}

/// Hard cut at `max` characters, no ellipsis.
fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Cut at `max` characters with a trailing ellipsis.
fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 15), "short");
        assert_eq!(clip("a-very-long-process-name", 15), "a-very-long-pro");
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("short", 50), "short");
        let long = "x".repeat(60);
        let cut = ellipsize(&long, 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));
    }
}
