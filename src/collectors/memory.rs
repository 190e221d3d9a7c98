use log::{debug, error};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::models::memory::MemoryCounters;

/// Parses `/proc/meminfo` style `Key:   value kB` lines.
pub struct MemorySampler {
    separator: Regex,
}

impl Default for MemorySampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySampler {
    pub fn new() -> Self {
        Self {
            separator: Regex::new(r":?\s+").expect("static regex"),
        }
    }

    /// Keep the recognized counters. Lines that are not exactly
    /// `key value unit`, or whose value does not parse, are skipped.
    pub fn parse<R: BufRead>(&self, reader: R) -> std::io::Result<MemoryCounters> {
        let mut counters = MemoryCounters::default();
        for line in reader.lines() {
            let line = line?;
            let fields: Vec<&str> = self.separator.splitn(&line, 3).collect();
            if fields.len() != 3 || !MemoryCounters::is_known(fields[0]) {
                continue;
            }
            if let Ok(kib) = fields[1].parse::<i64>() {
                counters.values.insert(fields[0].to_string(), kib);
            }
        }
        Ok(counters)
    }

    /// The memory section body; read failures show up as their error text.
    pub fn render(&self, path: &Path) -> String {
        let start = Instant::now();
        let result = match File::open(path).and_then(|f| self.parse(BufReader::new(f))) {
            Ok(counters) => counters.to_string(),
            Err(x) => {
                error!("Memory statistics error reading {}: {}", path.display(), x);
                x.to_string()
            }
        };
        debug!("collect_memory took: {} ms", start.elapsed().as_millis());
        result
    }
}
