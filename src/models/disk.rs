const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Usage of the root filesystem in bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskUsage {
    pub device: String,
    pub size: u64,
    pub free: u64,
}

impl DiskUsage {
    pub fn used(&self) -> u64 {
        self.size.saturating_sub(self.free)
    }
}

impl std::fmt::Display for DiskUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            " {} size:{}  used:{}  free:{}",
            self.device,
            human_bytes(self.size),
            human_bytes(self.used()),
            human_bytes(self.free)
        )
    }
}

/// Scale `val` to the smallest binary unit that keeps it below 1024.
///
/// Plain bytes are printed without a decimal: `0B`, `1023B`, `1.5 KB`.
pub fn human_bytes(val: u64) -> String {
    let val = val as u128;
    let unit = (0..UNITS.len())
        .find(|i| val < 1u128 << (10 * (i + 1)))
        .unwrap_or(UNITS.len() - 1);

    if unit == 0 {
        return format!("{}B", val);
    }
    let divisor = 1u128 << (10 * unit);
    format!("{:.1} {}", val as f64 / divisor as f64, UNITS[unit])
}
