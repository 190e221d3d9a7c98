use std::fmt;

/// How readings are pulled out of an hwmon device, keyed by its `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFamily {
    /// Every `tempN_input` and `fanN_input` in the device.
    PairedTempFan,
    /// Only `temp1_input`, shown under a fixed label.
    SingleTemp(&'static str),
    Unrecognized,
}

const FAMILIES: &[(&str, SensorFamily)] = &[
    ("acpitz", SensorFamily::PairedTempFan),
    ("nct6795", SensorFamily::PairedTempFan),
    ("nct6776", SensorFamily::PairedTempFan),
    ("thinkpad", SensorFamily::PairedTempFan),
    ("nouveau", SensorFamily::PairedTempFan),
    ("k10temp", SensorFamily::PairedTempFan),
    ("coretemp", SensorFamily::PairedTempFan),
    ("radeon", SensorFamily::SingleTemp("GPU")),
    ("iwlwifi", SensorFamily::SingleTemp("WiFi")),
];

impl SensorFamily {
    pub fn classify(module: &str) -> Self {
        FAMILIES
            .iter()
            .find(|(name, _)| *name == module)
            .map(|(_, family)| *family)
            .unwrap_or(SensorFamily::Unrecognized)
    }
}

/// A temperature input. `value` is the raw millidegree text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Temp {
    pub module: String,
    pub label: String,
    pub value: String,
}

impl Temp {
    /// Empty, zero and negative readings are sensor noise.
    pub fn is_valid_reading(value: &str) -> bool {
        !(value.is_empty() || value == "0" || value.starts_with('-'))
    }
}

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.label.is_empty() {
            &self.module
        } else {
            &self.label
        };
        let value = if self.value.is_empty() {
            "    -".to_string()
        } else {
            match self.value.parse::<i64>() {
                Ok(milli) => format!("{:5.1}", milli as f64 / 1000.0),
                // Keep the reading visible so a broken driver is obvious.
                Err(e) => e.to_string(),
            }
        };
        write!(f, "{:<14}   {} °C", label, value)
    }
}

/// A fan input. `value` is the raw rpm text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fan {
    pub label: String,
    pub value: String,
}

impl fmt::Display for Fan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value.is_empty() { "-" } else { &self.value };
        write!(f, "{:<10}   {:>4} rpm", self.label, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SensorFamily::classify("k10temp"), SensorFamily::PairedTempFan);
        assert_eq!(SensorFamily::classify("nct6795"), SensorFamily::PairedTempFan);
        assert_eq!(SensorFamily::classify("radeon"), SensorFamily::SingleTemp("GPU"));
        assert_eq!(SensorFamily::classify("iwlwifi"), SensorFamily::SingleTemp("WiFi"));
        assert_eq!(SensorFamily::classify("nvme"), SensorFamily::Unrecognized);
        assert_eq!(SensorFamily::classify("K10TEMP"), SensorFamily::Unrecognized);
        assert_eq!(SensorFamily::classify(""), SensorFamily::Unrecognized);
    }

    #[test]
    fn test_valid_reading() {
        assert!(Temp::is_valid_reading("42500"));
        assert!(!Temp::is_valid_reading(""));
        assert!(!Temp::is_valid_reading("0"));
        assert!(!Temp::is_valid_reading("-5"));
    }

    #[test]
    fn test_temp_display_converts_millidegrees() {
        let temp = Temp {
            module: "k10temp".to_string(),
            label: "Tctl".to_string(),
            value: "42500".to_string(),
        };
        assert_eq!(temp.to_string(), format!("{:<14}    42.5 °C", "Tctl"));
    }

    #[test]
    fn test_temp_display_falls_back_to_module() {
        let temp = Temp {
            module: "acpitz".to_string(),
            label: String::new(),
            value: "27800".to_string(),
        };
        assert!(temp.to_string().starts_with("acpitz "));
        assert!(temp.to_string().contains(" 27.8 °C"));
    }

    #[test]
    fn test_temp_display_empty_value() {
        let temp = Temp {
            module: "radeon".to_string(),
            label: "GPU".to_string(),
            value: String::new(),
        };
        assert!(temp.to_string().ends_with("    - °C"));
    }

    #[test]
    fn test_temp_display_shows_parse_error() {
        let temp = Temp {
            module: "k10temp".to_string(),
            label: "Tdie".to_string(),
            value: "n/a".to_string(),
        };
        assert!(temp.to_string().contains("invalid digit found in string"));
    }

    #[test]
    fn test_fan_display() {
        let fan = Fan {
            label: "fan1".to_string(),
            value: "812".to_string(),
        };
        assert_eq!(fan.to_string(), "fan1          812 rpm");

        let idle = Fan {
            label: "fan2".to_string(),
            value: String::new(),
        };
        assert_eq!(idle.to_string(), "fan2            - rpm");
    }
}
