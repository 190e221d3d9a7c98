use log::{debug, info};
use std::path::Path;
use std::time::Instant;

use crate::error::Result;
use crate::models::sensor::{Fan, SensorFamily, Temp};
use crate::utils::hwmon;

/// Every temperature and fan reading found under the hwmon class directory,
/// in device order.
pub fn collect_readings(root: &Path, diagnostics: bool) -> Result<(Vec<Temp>, Vec<Fan>)> {
    let start = Instant::now();
    let mut temps = Vec::new();
    let mut fans = Vec::new();

    for device in hwmon::list_devices(root)? {
        match SensorFamily::classify(&device.module) {
            SensorFamily::PairedTempFan => {
                let (t, f) = hwmon::temps_and_fans(&device.path, &device.module);
                temps.extend(t);
                fans.extend(f);
            }
            SensorFamily::SingleTemp(label) => {
                temps.push(hwmon::single_temp(&device.path, &device.module, label));
            }
            SensorFamily::Unrecognized => {
                if diagnostics {
                    info!("# unknown module {}", device.module);
                    info!("{}", hwmon::describe_inputs(&device.path));
                }
            }
        }
    }

    debug!("collect_readings took: {} ms", start.elapsed().as_millis());
    Ok((temps, fans))
}

/// Interleave temperatures and fans: paired lines first, then whichever
/// list is longer continues alone.
pub fn merge(temps: &[Temp], fans: &[Fan]) -> String {
    let paired = temps.len().min(fans.len());
    let mut out = String::new();
    for (temp, fan) in temps.iter().zip(fans) {
        out.push_str(&format!(" {}     {}\n", temp, fan));
    }
    for temp in &temps[paired..] {
        out.push_str(&format!(" {}\n", temp));
    }
    for fan in &fans[paired..] {
        out.push_str(&format!(" {}\n", fan));
    }
    out
}

/// The sensors section body.
pub fn collect_sensors(root: &Path, diagnostics: bool) -> Result<String> {
    let (temps, fans) = collect_readings(root, diagnostics)?;
    Ok(merge(&temps, &fans))
}
