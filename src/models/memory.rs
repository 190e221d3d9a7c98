use indexmap::IndexMap;

/// `/proc/meminfo` keys the memory section cares about.
pub const MEMORY_FIELDS: [&str; 6] = [
    "MemTotal",
    "MemFree",
    "MemAvailable",
    "SwapCached",
    "SwapTotal",
    "SwapFree",
];

/// Counters in KiB, keyed by their meminfo name in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCounters {
    pub values: IndexMap<String, i64>,
}

impl MemoryCounters {
    pub fn is_known(field: &str) -> bool {
        MEMORY_FIELDS.contains(&field)
    }

    /// Missing counters read as zero.
    pub fn get(&self, field: &str) -> i64 {
        self.values.get(field).copied().unwrap_or(0)
    }

    pub fn total_mib(&self) -> i64 {
        self.get("MemTotal") / 1024
    }

    pub fn free_mib(&self) -> i64 {
        self.get("MemFree") / 1024
    }

    pub fn available_mib(&self) -> i64 {
        self.get("MemAvailable") / 1024
    }

    pub fn swap_used_mib(&self) -> i64 {
        (self.get("SwapTotal") - self.get("SwapFree")) / 1024
    }
}

impl std::fmt::Display for MemoryCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            " total:{} free:{} available:{} swap:{}",
            self.total_mib(),
            self.free_mib(),
            self.available_mib(),
            self.swap_used_mib()
        )
    }
}
