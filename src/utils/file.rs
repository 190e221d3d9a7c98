use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use log::debug;
use std::time::Instant;

use crate::error::{MonitorError, Result};

/// Upper bound for a single pseudo-file read. Every sysfs attribute we
/// consume fits comfortably.
const RECORD_CAPACITY: usize = 128;

/// Read a short sysfs/procfs attribute in one `read(2)` call.
///
/// A missing file is the normal case for optional hwmon attributes and
/// yields an empty string. Other failures come back as their error text so
/// callers can put them straight on screen.
pub fn read_record(path: &Path) -> String {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return String::new(),
        Err(e) => return e.to_string(),
    };

    let mut buf = [0u8; RECORD_CAPACITY];
    match f.read(&mut buf) {
        Ok(n) => String::from_utf8_lossy(&buf[..n]).trim().to_string(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => e.to_string(),
    }
}

/// Find the device mounted on `/` in a mount table such as `/proc/mounts`.
pub fn root_device(mounts: &Path) -> Result<String> {
    let start = Instant::now();
    let file = File::open(mounts).map_err(|source| MonitorError::Open {
        path: mounts.display().to_string(),
        source,
    })?;

    let mut device = String::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| MonitorError::Read {
            path: mounts.display().to_string(),
            source,
        })?;
        let mut fields = line.split_whitespace();
        if let (Some(dev), Some("/")) = (fields.next(), fields.next()) {
            device = dev.to_string();
            break;
        }
    }

    debug!("root_device took: {} ms", start.elapsed().as_millis());
    Ok(device)
}
