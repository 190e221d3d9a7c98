use log::{debug, error};
use std::path::Path;
use std::time::Instant;
use systemstat::{Platform, System};

use crate::models::disk::DiskUsage;

/// statvfs figures for the filesystem mounted at `mount_point`.
pub fn collect_usage(sys: &System, mount_point: &Path, device: &str) -> std::io::Result<DiskUsage> {
    let fs = sys.mount_at(mount_point)?;
    Ok(DiskUsage {
        device: device.to_string(),
        size: fs.total.as_u64(),
        free: fs.free.as_u64(),
    })
}

/// The root-disk section body. statvfs failures are shown, not fatal.
pub fn collect_block_info(sys: &System, mount_point: &Path, device: &str) -> String {
    let start = Instant::now();
    let result = match collect_usage(sys, mount_point, device) {
        Ok(usage) => usage.to_string(),
        Err(x) => {
            error!("Filesystem statistics error for {}: {}", mount_point.display(), x);
            format!(" {} {}", device, x)
        }
    };
    debug!(
        "collect_block_info took: {} ms",
        start.elapsed().as_millis()
    );
    result
}
