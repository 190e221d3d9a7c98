use log::{debug, warn};
use std::process::Stdio;
use tokio::process::Command;
use tokio::runtime::Handle;

/// Load generators bound to the `c`, `C`, `m` and `M` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressJob {
    CpuOne,
    CpuAll,
    MatrixOne,
    MatrixAll,
}

impl StressJob {
    /// `stress-ng` arguments; a worker count of 0 means one per CPU.
    pub fn args(&self, timeout: &str) -> Vec<String> {
        let (stressor, workers) = match self {
            StressJob::CpuOne => ("--cpu", "1"),
            StressJob::CpuAll => ("--cpu", "0"),
            StressJob::MatrixOne => ("--matrix", "1"),
            StressJob::MatrixAll => ("--matrix", "0"),
        };
        vec![
            stressor.to_string(),
            workers.to_string(),
            "--timeout".to_string(),
            timeout.to_string(),
        ]
    }
}

/// Start `job` in the background and forget about it.
///
/// Output is discarded and nobody waits on the result; a missing binary is
/// only logged.
pub fn launch(runtime: &Handle, program: &str, timeout: &str, job: StressJob) {
    let mut cmd = Command::new(program);
    cmd.args(job.args(timeout))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let program = program.to_string();
    runtime.spawn(async move {
        match cmd.status().await {
            Ok(status) => debug!("{} {:?} exited with {}", program, job, status),
            Err(e) => warn!("Failed to run {}: {}", program, e),
        }
    });
}
