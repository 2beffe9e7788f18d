//! Colorized status output and the real terminal console.

use std::io::Write as _;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use vampirehunter_core::{Console, StatusKind};

/// Print a labeled, colorized status line.
///
/// Errors go to stderr, everything else to stdout.
pub fn status(kind: StatusKind, message: &str) {
    match kind {
        StatusKind::Info => println!("{}", format!("🔹 {}", message).blue()),
        StatusKind::Success => println!("{}", format!("✅ {}", message).green()),
        StatusKind::Warning => println!("{}", format!("⚠️  {}", message).yellow()),
        StatusKind::Error => eprintln!("{}", format!("❌ {}", message).red()),
        StatusKind::Highlight => println!("{}", message.cyan().bold()),
    }
}

/// Console backed by stdin lines; an interrupt reads as end-of-input.
pub struct TerminalConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn read_line(
        &mut self,
    ) -> impl std::future::Future<Output = std::io::Result<Option<String>>> + Send {
        async move {
            tokio::select! {
                line = self.lines.next_line() => line,
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    Ok(None)
                }
            }
        }
    }

    fn prompt(&mut self, text: &str) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }

    fn line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn status(&mut self, kind: StatusKind, message: &str) {
        status(kind, message);
    }
}
