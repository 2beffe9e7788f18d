//! Ranking and aggregation over snapshot record sets.

use crate::models::{ListenerProcess, RuntimeProcess};

/// Access to a record's resident memory, for ranking and totals.
pub trait ResidentMemory {
    fn resident_kb(&self) -> u64;
}

impl ResidentMemory for ListenerProcess {
    fn resident_kb(&self) -> u64 {
        self.memory_kb
    }
}

impl ResidentMemory for RuntimeProcess {
    fn resident_kb(&self) -> u64 {
        self.rss_kb
    }
}

/// Sort records by resident memory descending.
///
/// The sort is stable: ties keep their original enumeration order.
pub fn sort_by_memory_desc<T: ResidentMemory>(records: &mut [T]) {
    records.sort_by(|a, b| b.resident_kb().cmp(&a.resident_kb()));
}

/// Sum of resident memory across a record set.
///
/// The unknown sentinel 0 contributes zero; it never distorts the total.
pub fn total_memory_kb<T: ResidentMemory>(records: &[T]) -> u64 {
    records.iter().map(ResidentMemory::resident_kb).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_memory;

    fn listener(pid: u32, endpoint: &str, memory_kb: u64) -> ListenerProcess {
        ListenerProcess {
            pid,
            name: "node".to_string(),
            endpoint: endpoint.to_string(),
            memory_kb,
            command: "node server.js".to_string(),
        }
    }

    #[test]
    fn test_sort_descending() {
        let mut records = vec![
            listener(100, "*:8080", 2048),
            listener(300, "*:9000", 4096),
            listener(200, "*:3000", 100),
        ];
        sort_by_memory_desc(&mut records);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![300, 100, 200]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut records = vec![
            listener(1, "*:1111", 512),
            listener(2, "*:2222", 512),
            listener(3, "*:3333", 1024),
            listener(4, "*:4444", 512),
        ];
        sort_by_memory_desc(&mut records);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        // Tied records preserve their enumeration order.
        assert_eq!(pids, vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_total_treats_zero_as_zero() {
        let records = vec![
            listener(1, "*:1111", 2048),
            listener(2, "*:2222", 0),
            listener(3, "*:3333", 100),
        ];
        assert_eq!(total_memory_kb(&records), 2148);
    }

    #[test]
    fn test_snapshot_ordering_and_total() {
        let mut records = vec![listener(100, "8080", 2048), listener(200, "3000", 100)];
        sort_by_memory_desc(&mut records);
        let pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![100, 200]);

        let total = total_memory_kb(&records);
        assert_eq!(total, 2148);
        assert_eq!(format_memory(total), "2.1 MB");
    }
}
