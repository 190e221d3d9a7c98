use std::io;
use thiserror::Error;

/// Failures that leave the monitor unable to produce a trustworthy report.
///
/// Missing optional attributes never show up here; collectors render those as
/// blank fields instead.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("values for core id or cpu MHz empty")]
    MissingCoreFields,

    #[error("parse error in {field}: {detail}")]
    Parse { field: &'static str, detail: String },

    #[error("unexpected format in {path}: {detail}")]
    Format { path: String, detail: String },

    #[error("failed to enumerate hwmon devices in {path}: {source}")]
    Hwmon {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MonitorError>;
