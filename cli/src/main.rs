//! Vampire Hunter - detect and interactively kill server processes.
//!
//! Scans for processes listening on TCP ports, shows their memory usage,
//! and walks the operator through selective or bulk termination.

mod startup;
mod table;
mod ui;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use vampirehunter_core::{
    snapshot, ProcessKiller, RuntimeScanner, Session, SessionOutcome, StatusKind,
};

use ui::TerminalConsole;

/// Detect and manage server processes (vampire processes) with memory usage.
#[derive(Parser)]
#[command(name = "vampire-hunter")]
#[command(version, about = "Detect and manage server processes (vampire processes) with memory usage")]
#[command(after_help = "\
The tool will:
  1. Scan for processes listening on TCP ports (vampire processes)
  2. Show memory usage for each process in a formatted table
  3. Present them in an interactive menu
  4. Allow you to selectively kill them

Features:
  - Memory usage per process and estimated totals
  - Safe process killing (SIGTERM first, then SIGKILL if needed)
  - Selective or bulk killing with confirmation prompts
  - Refresh option to update the process list
  - System memory statistics and runtime process views")]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    if let Err(missing) = startup::check_required_tools().await {
        ui::status(
            StatusKind::Error,
            &format!(
                "{} command not found. Please install {} to use this tool.",
                missing, missing
            ),
        );
        std::process::exit(1);
    }

    println!("{}", "🧛 Vampire Hunter - Process Manager".green());
    println!("{}", "=".repeat(38));
    println!();

    let mut console = TerminalConsole::new();
    let session = Session::new(ProcessKiller::new());
    let runtime_scanner = RuntimeScanner::default();

    // Outer loop re-snapshots; the session owns one snapshot at a time.
    'snapshot: loop {
        ui::status(StatusKind::Info, "Scanning for server processes...");
        let listeners = snapshot::capture_listeners(&mut console).await;
        table::render_listeners(&listeners);
        if listeners.is_empty() {
            break;
        }

        loop {
            match session.run(&mut console, &listeners).await {
                SessionOutcome::Refresh => continue 'snapshot,
                SessionOutcome::Quit => break 'snapshot,
                SessionOutcome::MemoryView => {
                    let memory = snapshot::capture_system_memory(&mut console).await;
                    table::render_system_memory(&memory);
                }
                SessionOutcome::RuntimeView => {
                    let processes =
                        snapshot::capture_runtime(&mut console, &runtime_scanner).await;
                    table::render_runtime(&processes);
                }
            }
        }
    }

    Ok(())
}
