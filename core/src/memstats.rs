//! Aggregate system memory statistics.
//!
//! macOS reads `vm_stat` page counts; Linux reads `/proc/meminfo`. Both are
//! parsed tolerantly: unknown keys are ignored and missing keys default to
//! zero, so a partial report never fails the snapshot.

#[cfg(any(target_os = "macos", test))]
use std::collections::HashMap;
#[cfg(target_os = "macos")]
use std::process::Stdio;

#[cfg(target_os = "macos")]
use tokio::process::Command;

#[cfg(target_os = "macos")]
use crate::error::Error;
use crate::error::Result;
use crate::models::SystemMemory;

/// Page size used to convert vm_stat page counts to MB.
#[cfg(any(target_os = "macos", test))]
const PAGE_SIZE_BYTES: u64 = 4096;

#[cfg(any(target_os = "macos", test))]
const PAGES_PER_MB: u64 = 1024 * 1024 / PAGE_SIZE_BYTES;

/// Read the aggregate system memory snapshot.
#[cfg(target_os = "macos")]
pub async fn read_system_memory() -> Result<SystemMemory> {
    let output = Command::new("vm_stat")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::CommandFailed(format!("Failed to run vm_stat: {}", e)))?;

    if !output.status.success() {
        return Err(Error::CommandFailed(format!(
            "vm_stat exited with {}",
            output.status
        )));
    }

    let stdout = String::from_utf8(output.stdout)
        .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in vm_stat output: {}", e)))?;

    Ok(parse_vm_stat(&stdout))
}

/// Read the aggregate system memory snapshot.
#[cfg(target_os = "linux")]
pub async fn read_system_memory() -> Result<SystemMemory> {
    let contents = tokio::fs::read_to_string("/proc/meminfo").await?;
    Ok(parse_meminfo(&contents))
}

/// Parse `vm_stat` key/value output.
///
/// Expected format:
/// ```text
/// Mach Virtual Memory Statistics: (page size of 4096 bytes)
/// Pages free:                              131072.
/// Pages active:                            262144.
/// ```
#[cfg(any(target_os = "macos", test))]
fn parse_vm_stat(output: &str) -> SystemMemory {
    let mut pages: HashMap<&str, u64> = HashMap::new();

    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(count) = value.trim().trim_end_matches('.').parse::<u64>() else {
            continue;
        };
        pages.insert(key.trim(), count);
    }

    let page_count = |key: &str| pages.get(key).copied().unwrap_or(0);

    SystemMemory {
        free_mb: page_count("Pages free") / PAGES_PER_MB,
        active_mb: page_count("Pages active") / PAGES_PER_MB,
        inactive_mb: page_count("Pages inactive") / PAGES_PER_MB,
        wired_mb: page_count("Pages wired down") / PAGES_PER_MB,
        compressed_mb: page_count("Pages occupied by compressor") / PAGES_PER_MB,
    }
}

/// Parse `/proc/meminfo` kB values onto the same structure.
///
/// Kernel-reserved memory maps to `Slab`, compressed memory to `SwapCached`;
/// both default to zero when the kernel does not report them.
#[cfg(any(target_os = "linux", test))]
fn parse_meminfo(contents: &str) -> SystemMemory {
    let kb_for = |wanted: &str| -> u64 {
        for line in contents.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            if key.trim() != wanted {
                continue;
            }
            if let Some(count) = value.split_whitespace().next() {
                if let Ok(kb) = count.parse::<u64>() {
                    return kb;
                }
            }
        }
        0
    };

    SystemMemory {
        free_mb: kb_for("MemFree") / 1024,
        active_mb: kb_for("Active") / 1024,
        inactive_mb: kb_for("Inactive") / 1024,
        wired_mb: kb_for("Slab") / 1024,
        compressed_mb: kb_for("SwapCached") / 1024,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vm_stat() {
        let output = "\
Mach Virtual Memory Statistics: (page size of 4096 bytes)
Pages free:                              131072.
Pages active:                            262144.
Pages inactive:                           65536.
Pages speculative:                        12345.
Pages wired down:                         32768.
Pages occupied by compressor:             16384.
";
        let memory = parse_vm_stat(output);
        assert_eq!(memory.free_mb, 512);
        assert_eq!(memory.active_mb, 1024);
        assert_eq!(memory.inactive_mb, 256);
        assert_eq!(memory.wired_mb, 128);
        assert_eq!(memory.compressed_mb, 64);
    }

    #[test]
    fn test_vm_stat_missing_keys_default_to_zero() {
        let output = "\
Mach Virtual Memory Statistics: (page size of 4096 bytes)
Pages free:                              131072.
";
        let memory = parse_vm_stat(output);
        assert_eq!(memory.free_mb, 512);
        assert_eq!(memory.active_mb, 0);
        assert_eq!(memory.wired_mb, 0);
        assert_eq!(memory.compressed_mb, 0);
    }

    #[test]
    fn test_vm_stat_garbage_lines_are_ignored() {
        let output = "\
not a key value line
Pages active: not-a-number.
Pages free:                              256.
";
        let memory = parse_vm_stat(output);
        assert_eq!(memory.free_mb, 1);
        assert_eq!(memory.active_mb, 0);
    }

    #[test]
    fn test_parse_meminfo() {
        let contents = "\
MemTotal:       16384000 kB
MemFree:         2097152 kB
Active:          4194304 kB
Inactive:        1048576 kB
Slab:             524288 kB
SwapCached:       131072 kB
";
        let memory = parse_meminfo(contents);
        assert_eq!(memory.free_mb, 2048);
        assert_eq!(memory.active_mb, 4096);
        assert_eq!(memory.inactive_mb, 1024);
        assert_eq!(memory.wired_mb, 512);
        assert_eq!(memory.compressed_mb, 128);
    }

    #[test]
    fn test_meminfo_missing_keys_default_to_zero() {
        let memory = parse_meminfo("MemFree: 1048576 kB\n");
        assert_eq!(memory.free_mb, 1024);
        assert_eq!(memory.active_mb, 0);
        assert_eq!(memory.compressed_mb, 0);
    }
}
