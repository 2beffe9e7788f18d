//! Interactive session decision protocol.
//!
//! A state machine over one snapshot at a time. All terminal traffic goes
//! through the [`Console`] trait so the protocol is testable without a tty:
//! the real console lives in the binary crate.

use std::io;

use crate::format::format_memory;
use crate::kill::{kill_all, KillOutcome, Terminator};
use crate::models::ListenerProcess;

/// Message kinds for operator-facing status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
    Highlight,
}

/// Abstract console boundary for the interactive session.
pub trait Console {
    /// Read one line of input. `Ok(None)` means end-of-input or an
    /// interrupt; both terminate the session cleanly.
    fn read_line(&mut self)
        -> impl std::future::Future<Output = io::Result<Option<String>>> + Send;

    /// Write text without a trailing newline (prompts).
    fn prompt(&mut self, text: &str);

    /// Write one line of plain text.
    fn line(&mut self, text: &str);

    /// Emit a labeled status line.
    fn status(&mut self, kind: StatusKind, message: &str);
}

/// One parsed menu choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Kill the record at this 1-based index (already bounds-checked).
    Kill(usize),
    /// Kill every record in the snapshot.
    KillAll,
    /// Rebuild the snapshot.
    Refresh,
    /// End the session.
    Quit,
    /// Show the system memory view.
    MemoryView,
    /// Show the runtime process view.
    RuntimeView,
    /// A numeric choice outside `1..=record_count`.
    OutOfRange(usize),
    /// Anything else.
    Unrecognized,
}

/// Parse one line of operator input against the current record count.
pub fn parse_choice(input: &str, record_count: usize) -> Choice {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "q" => Choice::Quit,
        "a" => Choice::KillAll,
        "r" => Choice::Refresh,
        "m" => Choice::MemoryView,
        "n" => Choice::RuntimeView,
        _ => match input.parse::<usize>() {
            Ok(index) if (1..=record_count).contains(&index) => Choice::Kill(index),
            Ok(index) => Choice::OutOfRange(index),
            Err(_) => Choice::Unrecognized,
        },
    }
}

/// Why the session returned control to the outer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Re-snapshot and start over.
    Refresh,
    /// Terminate the program.
    Quit,
    /// Render the system memory view, then resume prompting.
    MemoryView,
    /// Render the runtime process view, then resume prompting.
    RuntimeView,
}

/// Interactive session over one snapshot.
pub struct Session<K> {
    terminator: K,
}

impl<K: Terminator> Session<K> {
    /// Create a session around a terminator.
    pub fn new(terminator: K) -> Self {
        Self { terminator }
    }

    /// Drive the prompt loop until the operator refreshes, quits, or asks
    /// for an auxiliary view. Kills mutate the OS process table, never the
    /// snapshot: the record list stays as-is until a refresh.
    pub async fn run<C: Console>(
        &self,
        console: &mut C,
        listeners: &[ListenerProcess],
    ) -> SessionOutcome {
        loop {
            print_menu(console);

            let input = match console.read_line().await {
                Ok(Some(input)) => input,
                Ok(None) | Err(_) => {
                    console.status(StatusKind::Info, "Exiting...");
                    return SessionOutcome::Quit;
                }
            };

            match parse_choice(&input, listeners.len()) {
                Choice::Quit => {
                    console.status(StatusKind::Info, "Exiting...");
                    return SessionOutcome::Quit;
                }
                Choice::Refresh => {
                    console.status(StatusKind::Info, "Refreshing process list...");
                    return SessionOutcome::Refresh;
                }
                Choice::MemoryView => return SessionOutcome::MemoryView,
                Choice::RuntimeView => return SessionOutcome::RuntimeView,
                Choice::Kill(index) => {
                    self.kill_one_flow(console, &listeners[index - 1]).await;
                }
                Choice::KillAll => {
                    self.kill_all_flow(console, listeners).await;
                }
                Choice::OutOfRange(_) => {
                    console.status(
                        StatusKind::Warning,
                        &format!(
                            "Invalid choice. Please enter a number between 1 and {}, \
                             'a', 'r', 'm', 'n', or 'q'.",
                            listeners.len()
                        ),
                    );
                }
                Choice::Unrecognized => {
                    console.status(
                        StatusKind::Warning,
                        "Invalid choice. Please enter a number, 'a', 'r', 'm', 'n', or 'q'.",
                    );
                }
            }
        }
    }

    /// Single-kill flow: confirm, graceful terminate, offer exactly one
    /// force retry on failure.
    async fn kill_one_flow<C: Console>(&self, console: &mut C, listener: &ListenerProcess) {
        let question = format!(
            "Kill process {} (PID: {}, Memory: {})? (y/N): ",
            listener.name,
            listener.pid,
            format_memory(listener.memory_kb)
        );
        if !confirm(console, &question).await {
            console.status(StatusKind::Info, "Cancelled");
            return;
        }

        let outcome = self.terminator.terminate(listener.pid, false);
        if report_outcome(console, listener, &outcome) {
            return;
        }

        if confirm(console, "Try force kill? (y/N): ").await {
            let outcome = self.terminator.terminate(listener.pid, true);
            report_outcome(console, listener, &outcome);
        }
    }

    /// Bulk flow: confirm once, then terminate every record sequentially.
    async fn kill_all_flow<C: Console>(&self, console: &mut C, listeners: &[ListenerProcess]) {
        let question = "Are you sure you want to kill ALL server processes? (y/N): ";
        if !confirm(console, question).await {
            console.status(StatusKind::Info, "Cancelled");
            return;
        }

        let outcomes = kill_all(&self.terminator, listeners);
        let mut killed = 0;
        for (listener, outcome) in &outcomes {
            if report_outcome(console, listener, outcome) {
                killed += 1;
            }
        }
        console.status(
            StatusKind::Success,
            &format!("Killed {}/{} processes", killed, listeners.len()),
        );
    }
}

fn print_menu<C: Console>(console: &mut C) {
    console.line("");
    console.line("Select action:");
    console.line("  Enter number to kill a specific process");
    console.line("  'a' to kill ALL processes");
    console.line("  'r' to refresh the list");
    console.line("  'm' to show system memory statistics");
    console.line("  'n' to show runtime processes");
    console.line("  'q' to quit");
    console.prompt("Choice: ");
}

/// Ask a yes/no question. Only an explicit `y`/`yes` (case-insensitive)
/// confirms; anything else, end-of-input included, declines.
async fn confirm<C: Console>(console: &mut C, question: &str) -> bool {
    console.prompt(question);
    match console.read_line().await {
        Ok(Some(answer)) => {
            let answer = answer.trim().to_lowercase();
            answer == "y" || answer == "yes"
        }
        _ => false,
    }
}

/// Report one termination outcome. Returns whether a signal was delivered.
fn report_outcome<C: Console>(
    console: &mut C,
    listener: &ListenerProcess,
    outcome: &KillOutcome,
) -> bool {
    match outcome {
        KillOutcome::Terminated => {
            console.status(
                StatusKind::Success,
                &format!(
                    "Successfully terminated process {} (PID: {})",
                    listener.name, listener.pid
                ),
            );
            true
        }
        KillOutcome::ForceKilled => {
            console.status(
                StatusKind::Warning,
                &format!(
                    "Force killed process {} (PID: {})",
                    listener.name, listener.pid
                ),
            );
            true
        }
        KillOutcome::NotFound => {
            console.status(
                StatusKind::Error,
                &format!("Process {} (PID: {}) not found", listener.name, listener.pid),
            );
            false
        }
        KillOutcome::PermissionDenied => {
            console.status(
                StatusKind::Error,
                &format!(
                    "Access denied when trying to kill process {} (PID: {})",
                    listener.name, listener.pid
                ),
            );
            false
        }
        KillOutcome::Failed(detail) => {
            console.status(
                StatusKind::Error,
                &format!(
                    "Error killing process {} (PID: {}): {}",
                    listener.name, listener.pid, detail
                ),
            );
            false
        }
    }
}
