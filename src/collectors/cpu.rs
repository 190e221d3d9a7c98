use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{MonitorError, Result};
use crate::models::cpu::{CoreFrequencySample, FrequencyStats};

const HEADER: &str = "Core          0         1         2         3         4  GHz    Min  Max";
const FOOTER: &str = "              0         1         2         3         4  GHz    Min  Max";

/// Width of the bar column; one `#` per 100 MHz.
const BAR_WIDTH: usize = 47;
/// Column of the 4 GHz marker.
const MARKER_COLUMN: usize = 39;
const MARKER: &str = "|       ";

/// Per-core frequency table built from `/proc/cpuinfo`.
///
/// The file is opened on first use and rewound before every scan. The sampler
/// is owned by the refresh loop; only the [`FrequencyStats`] it feeds are
/// shared with other threads.
pub struct CpuSampler {
    path: PathBuf,
    file: Option<File>,
    stats: Arc<FrequencyStats>,
}

impl CpuSampler {
    pub fn new(path: impl Into<PathBuf>, stats: Arc<FrequencyStats>) -> Self {
        Self {
            path: path.into(),
            file: None,
            stats,
        }
    }

    pub fn stats(&self) -> &Arc<FrequencyStats> {
        &self.stats
    }

    /// Scan the cpuinfo stream once, folding each physical core's frequency
    /// into the shared stats. Samples come back ordered by core id.
    pub fn sample(&mut self) -> Result<Vec<CoreFrequencySample>> {
        let start = Instant::now();
        let path = self.path.display().to_string();

        let file = match self.file.as_mut() {
            Some(file) => file,
            None => {
                let file = File::open(&self.path).map_err(|source| MonitorError::Open {
                    path: path.clone(),
                    source,
                })?;
                self.file.insert(file)
            }
        };
        file.seek(SeekFrom::Start(0))
            .map_err(|source| MonitorError::Read {
                path: path.clone(),
                source,
            })?;

        let mut cores: BTreeMap<u32, CoreFrequencySample> = BTreeMap::new();
        let mut core_id_line = String::new();
        let mut mhz_line = String::new();

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| MonitorError::Read {
                path: path.clone(),
                source,
            })?;

            if line.starts_with("core id") {
                core_id_line = line;
                continue;
            }
            if line.starts_with("cpu MHz") {
                mhz_line = line;
                continue;
            }
            if !line.starts_with("flags") {
                continue;
            }

            // "flags" closes one logical processor's record.
            if core_id_line.is_empty() || mhz_line.is_empty() {
                return Err(MonitorError::MissingCoreFields);
            }
            let core_id: u32 = parse_field(&core_id_line, "core id")?;
            if cores.contains_key(&core_id) {
                // Hyperthread sibling of a core we already have.
                continue;
            }
            let frequency_mhz: f64 = parse_field(&mhz_line, "cpu MHz")?;

            self.stats.observe(core_id, frequency_mhz);
            cores.insert(
                core_id,
                CoreFrequencySample {
                    core_id,
                    frequency_mhz,
                    bar: frequency_bar(frequency_mhz),
                },
            );
            core_id_line.clear();
            mhz_line.clear();
        }

        debug!("cpu sample took: {} ms", start.elapsed().as_millis());
        Ok(cores.into_values().collect())
    }

    /// The frequency section of the report.
    pub fn render(&mut self) -> Result<String> {
        let samples = self.sample()?;

        let mut out = String::with_capacity(HEADER.len() * (samples.len() + 2));
        out.push_str(HEADER);
        out.push('\n');
        for sample in &samples {
            let range = self.stats.get(sample.core_id);
            out.push_str(&format!(
                " {:2}: {:4.0} MHz |{}  {:4.0} {:4.0}\n",
                sample.core_id, sample.frequency_mhz, sample.bar, range.min_mhz, range.max_mhz
            ));
        }
        out.push_str(FOOTER);
        out.push('\n');
        Ok(out)
    }
}

/// Parse the value after the first `:` of a cpuinfo line.
fn parse_field<T>(line: &str, field: &'static str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = line
        .split_once(':')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| MonitorError::Parse {
            field,
            detail: format!("no value in {:?}", line),
        })?;
    value.parse().map_err(|e: T::Err| MonitorError::Parse {
        field,
        detail: format!("{:?}: {}", value, e),
    })
}

/// `#` per 100 MHz, padded to a fixed width with a marker at 4 GHz.
pub fn frequency_bar(mhz: f64) -> String {
    let len = ((mhz / 100.0).round().max(0.0) as usize).min(BAR_WIDTH);
    let mut bar = "#".repeat(len);
    if len <= MARKER_COLUMN {
        bar.push_str(&" ".repeat(MARKER_COLUMN - len));
        bar.push_str(MARKER);
    } else {
        bar.push_str(&" ".repeat(BAR_WIDTH - len));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(processor: u32, core_id: u32, mhz: &str) -> String {
        format!(
            "processor\t: {processor}\n\
             vendor_id\t: AuthenticAMD\n\
             cpu MHz\t\t: {mhz}\n\
             physical id\t: 0\n\
             core id\t\t: {core_id}\n\
             cpu cores\t: 2\n\
             flags\t\t: fpu vme de pse\n\
             bogomips\t: 7186.07\n\n"
        )
    }

    fn cpuinfo(records: &[(u32, u32, &str)]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        for (processor, core_id, mhz) in records {
            f.write_all(record(*processor, *core_id, mhz).as_bytes()).unwrap();
        }
        f.flush().unwrap();
        f
    }

    fn rewrite(f: &NamedTempFile, records: &[(u32, u32, &str)]) {
        let body: String = records
            .iter()
            .map(|(p, c, m)| record(*p, *c, m))
            .collect();
        std::fs::write(f.path(), body).unwrap();
    }

    #[test]
    fn test_constant_input_pins_min_and_max() {
        let f = cpuinfo(&[(0, 0, "2100.000"), (1, 1, "2100.000")]);
        let stats = Arc::new(FrequencyStats::new());
        let mut sampler = CpuSampler::new(f.path(), Arc::clone(&stats));

        for _ in 0..3 {
            let samples = sampler.sample().unwrap();
            assert_eq!(samples.len(), 2);
            for sample in samples {
                let range = stats.get(sample.core_id);
                assert_eq!(range.min_mhz, 2100.0);
                assert_eq!(range.max_mhz, 2100.0);
            }
        }
    }

    #[test]
    fn test_first_sibling_wins() {
        let f = cpuinfo(&[(0, 0, "1800.000"), (1, 0, "3600.000")]);
        let stats = Arc::new(FrequencyStats::new());
        let mut sampler = CpuSampler::new(f.path(), Arc::clone(&stats));

        let samples = sampler.sample().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].frequency_mhz, 1800.0);
        assert_eq!(stats.get(0).max_mhz, 1800.0);
    }

    #[test]
    fn test_samples_sorted_by_core_id() {
        let f = cpuinfo(&[(0, 2, "1000"), (1, 0, "2000"), (2, 1, "3000")]);
        let mut sampler = CpuSampler::new(f.path(), Arc::new(FrequencyStats::new()));
        let ids: Vec<u32> = sampler.sample().unwrap().iter().map(|s| s.core_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_rescan_sees_new_content_and_reset() {
        let f = cpuinfo(&[(0, 0, "1500.000")]);
        let stats = Arc::new(FrequencyStats::new());
        let mut sampler = CpuSampler::new(f.path(), Arc::clone(&stats));
        sampler.sample().unwrap();

        rewrite(&f, &[(0, 0, "3900.000")]);
        sampler.sample().unwrap();
        assert_eq!(stats.get(0).min_mhz, 1500.0);
        assert_eq!(stats.get(0).max_mhz, 3900.0);

        stats.reset();
        rewrite(&f, &[(0, 0, "2700.000")]);
        sampler.sample().unwrap();
        assert_eq!(stats.get(0).min_mhz, 2700.0);
        assert_eq!(stats.get(0).max_mhz, 2700.0);
    }

    #[test]
    fn test_missing_core_id_is_fatal() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "processor\t: 0\ncpu MHz\t\t: 1200.0\nflags\t\t: fpu\n").unwrap();
        let mut sampler = CpuSampler::new(f.path(), Arc::new(FrequencyStats::new()));
        assert!(matches!(sampler.sample(), Err(MonitorError::MissingCoreFields)));
    }

    #[test]
    fn test_bad_frequency_is_fatal() {
        let f = cpuinfo(&[(0, 0, "fast")]);
        let mut sampler = CpuSampler::new(f.path(), Arc::new(FrequencyStats::new()));
        assert!(matches!(
            sampler.sample(),
            Err(MonitorError::Parse { field: "cpu MHz", .. })
        ));
    }

    #[test]
    fn test_missing_cpuinfo_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut sampler =
            CpuSampler::new(dir.path().join("cpuinfo"), Arc::new(FrequencyStats::new()));
        assert!(matches!(sampler.sample(), Err(MonitorError::Open { .. })));
    }

    #[test]
    fn test_frequency_bar() {
        let slow = frequency_bar(1240.0);
        assert_eq!(slow.len(), BAR_WIDTH);
        assert!(slow.starts_with("############ "));
        assert_eq!(&slow[MARKER_COLUMN..], MARKER);

        let fast = frequency_bar(4420.0);
        assert_eq!(fast.len(), BAR_WIDTH);
        assert_eq!(fast.trim_end(), "#".repeat(44));

        assert_eq!(frequency_bar(9000.0), "#".repeat(BAR_WIDTH));
        assert_eq!(frequency_bar(0.0).trim(), "|");
    }

    #[test]
    fn test_render_rows() {
        let f = cpuinfo(&[(0, 0, "2100.000"), (1, 1, "800.400")]);
        let mut sampler = CpuSampler::new(f.path(), Arc::new(FrequencyStats::new()));
        let text = sampler.render().unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[3], FOOTER);
        assert!(lines[1].starts_with("  0: 2100 MHz |#####################"));
        assert!(lines[1].ends_with("  2100 2100"));
        assert!(lines[2].starts_with("  1:  800 MHz |########"));
        assert!(lines[2].ends_with("   800  800"));
    }
}
