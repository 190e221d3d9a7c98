use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use systemstat::{Platform, System as SystemStat};

use crate::collectors::cpu::CpuSampler;
use crate::collectors::memory::MemorySampler;
use crate::collectors::{disk, sensors, system};
use crate::config::PathsConfig;
use crate::error::Result;
use crate::models::cpu::FrequencyStats;
use crate::utils::file;

/// The pieces of monitor state other threads may touch.
#[derive(Debug, Clone, Default)]
pub struct MonitorHandle {
    stats: Arc<FrequencyStats>,
    diagnostics: Arc<AtomicBool>,
}

impl MonitorHandle {
    pub fn reset_stats(&self) {
        debug!("Resetting frequency min/max");
        self.stats.reset();
    }

    /// Flip diagnostic verbosity and return the new state.
    pub fn toggle_diagnostics(&self) -> bool {
        !self.diagnostics.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> &Arc<FrequencyStats> {
        &self.stats
    }
}

/// Builds the full text report, one collector after another.
pub struct Monitor {
    paths: PathsConfig,
    handle: MonitorHandle,
    cpu: CpuSampler,
    memory: MemorySampler,
    sys_stat: SystemStat,
    root_device: String,
}

impl Monitor {
    /// Resolves the root device up front; a missing mount table is fatal.
    pub fn new(paths: PathsConfig) -> Result<Self> {
        let handle = MonitorHandle::default();
        let root_device = file::root_device(&paths.mounts)?;
        debug!("Root device: {}", root_device);
        Ok(Self {
            cpu: CpuSampler::new(paths.cpuinfo.clone(), Arc::clone(&handle.stats)),
            memory: MemorySampler::new(),
            sys_stat: SystemStat::new(),
            root_device,
            handle,
            paths,
        })
    }

    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }

    pub fn root_device(&self) -> &str {
        &self.root_device
    }

    /// CPU, memory, load, disk and sensors, in that order.
    ///
    /// Any error is one the report cannot recover from: the host does not
    /// look like the Linux we expect.
    pub fn render_report(&mut self) -> Result<String> {
        let start = Instant::now();
        let diagnostics = self.handle.diagnostics();
        let paths = &self.paths;

        let cpu = &mut self.cpu;
        let mut out = timed(diagnostics, || cpu.render())?;

        out.push_str("Memory [MiB]\n");
        out.push_str(&timed(diagnostics, || Ok(self.memory.render(&paths.meminfo)))?);
        out.push('\n');

        out.push_str("Load average\n");
        out.push_str(&timed(diagnostics, || system::collect_load(&paths.loadavg))?);
        out.push('\n');

        out.push_str("Root disk\n");
        out.push_str(&timed(diagnostics, || {
            Ok(disk::collect_block_info(&self.sys_stat, &paths.root, &self.root_device))
        })?);
        out.push_str("\n\n");

        out.push_str("Sensors\n");
        out.push_str(&timed(diagnostics, || {
            sensors::collect_sensors(&paths.hwmon, diagnostics)
        })?);

        debug!("render_report took: {} ms", start.elapsed().as_millis());
        Ok(out)
    }
}

/// Prefix a section with its elapsed time when diagnostics are on.
fn timed<F>(diagnostics: bool, section: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    if !diagnostics {
        return section();
    }
    let start = Instant::now();
    let text = section()?;
    let elapsed = Duration::from_micros(start.elapsed().as_micros() as u64);
    Ok(format!(" ({:?})\n{}", elapsed, text))
}
