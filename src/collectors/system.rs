use log::{debug, error};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::error::{MonitorError, Result};
use crate::models::system::LoadAverage;

// 1    2    3    4     5
// 0.00 0.12 0.09 1/371 4461
//
// 1-3: load averages over 1, 5 and 15 minutes
// 4:   runnable/total kernel scheduling entities
// 5:   PID of the most recently created process
pub fn parse_load(line: &str, path: &Path) -> Result<LoadAverage> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(MonitorError::Format {
            path: path.display().to_string(),
            detail: format!("expected 5 fields, got {:?}", line.trim()),
        });
    }
    Ok(LoadAverage {
        one: fields[0].to_string(),
        five: fields[1].to_string(),
        fifteen: fields[2].to_string(),
        entities: fields[3].to_string(),
        last_pid: fields[4].to_string(),
    })
}

/// The load-average section body. An unreadable file renders as nothing.
pub fn collect_load(path: &Path) -> Result<String> {
    let start = Instant::now();
    let result = match fs::read_to_string(path) {
        Ok(line) => parse_load(&line, path)?.to_string(),
        Err(x) => {
            error!("Load average: error reading {}: {}", path.display(), x);
            String::new()
        }
    };
    debug!("collect_load took: {} ms", start.elapsed().as_millis());
    Ok(result)
}
