use std::fs::read_dir;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{MonitorError, Result};
use crate::models::sensor::{Fan, Temp};
use crate::utils::file::read_record;

/// One `hwmon` device (e.g. `/sys/class/hwmon/hwmon3`) and its driver name.
#[derive(Debug, Clone, PartialEq)]
pub struct HwmonDevice {
    pub path: PathBuf,
    pub module: String,
}

/// List the devices under an hwmon class directory in name order.
///
/// The kernel exposes each device as a symlink into `/sys/devices`; anything
/// else in the directory is skipped. A missing directory means the machine
/// has no sensors, which is not an error.
///
/// Kernel hwmon sysfs ABI: https://www.kernel.org/doc/html/latest/hwmon/sysfs-interface.html
pub fn list_devices(root: &Path) -> Result<Vec<HwmonDevice>> {
    let dir = match read_dir(root) {
        Ok(dir) => dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(MonitorError::Hwmon {
                path: root.display().to_string(),
                source,
            })
        }
    };

    let mut paths = Vec::new();
    for entry in dir {
        let entry = entry.map_err(|source| MonitorError::Hwmon {
            path: root.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_ok_and(|file_type| file_type.is_symlink()) {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let module = read_record(&path.join("name"));
            HwmonDevice { path, module }
        })
        .collect())
}

/// Every `*input` attribute of a device, sorted by file name.
pub fn input_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().ends_with("input"))
        .map(|entry| entry.into_path())
        .collect()
}

/// `temp3_input` -> `temp3`.
fn attribute_stem(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix("_input") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Collect every temperature and fan input of a board/CPU style device.
///
/// - `fanN_input` becomes a [`Fan`] labelled `fanN`.
/// - `tempN_input` becomes a [`Temp`] labelled by `tempN_label` if present.
///   Empty, zero and negative readings are dropped.
///
/// Other inputs (voltages, currents, power) are ignored.
pub fn temps_and_fans(dir: &Path, module: &str) -> (Vec<Temp>, Vec<Fan>) {
    let mut temps = Vec::new();
    let mut fans = Vec::new();

    for file in input_files(dir) {
        let stem = attribute_stem(&file);
        if stem.starts_with("fan") {
            fans.push(Fan {
                label: stem,
                value: read_record(&file),
            });
            continue;
        }
        if stem.starts_with("temp") {
            let value = read_record(&file);
            if !Temp::is_valid_reading(&value) {
                continue;
            }
            temps.push(Temp {
                module: module.to_string(),
                label: read_record(&dir.join(format!("{}_label", stem))),
                value,
            });
        }
    }

    (temps, fans)
}

/// Devices that only report one interesting temperature (GPU, WiFi).
pub fn single_temp(dir: &Path, module: &str, label: &str) -> Temp {
    Temp {
        module: module.to_string(),
        label: label.to_string(),
        value: read_record(&dir.join("temp1_input")),
    }
}

/// Raw dump of a device's inputs, for drivers we do not know how to present.
pub fn describe_inputs(dir: &Path) -> String {
    input_files(dir)
        .iter()
        .map(|file| format!(" {:<14}   {}\n", attribute_stem(file), read_record(file)))
        .collect()
}
