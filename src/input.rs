use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{error, info};
use std::thread;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::collectors::collector::MonitorHandle;
use crate::config::MonitorConfig;
use crate::stress::{self, StressJob};

const MIN_INTERVAL: Duration = Duration::from_millis(10);
const MAX_INTERVAL: Duration = Duration::from_secs(10);

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    SlowDown,
    SpeedUp,
    Help,
    ToggleDiagnostics,
    ResetStats,
    Stress(StressJob),
    /// Any other key; dismisses the help screen.
    Other,
}

pub fn map_key(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('+') => KeyAction::SlowDown,
        KeyCode::Char('-') => KeyAction::SpeedUp,
        KeyCode::Char('h') | KeyCode::Char('?') => KeyAction::Help,
        KeyCode::Char('d') => KeyAction::ToggleDiagnostics,
        KeyCode::Char('r') => KeyAction::ResetStats,
        KeyCode::Char('c') => KeyAction::Stress(StressJob::CpuOne),
        KeyCode::Char('C') => KeyAction::Stress(StressJob::CpuAll),
        KeyCode::Char('m') => KeyAction::Stress(StressJob::MatrixOne),
        KeyCode::Char('M') => KeyAction::Stress(StressJob::MatrixAll),
        _ => KeyAction::Other,
    }
}

pub const HELP: &str = "Special Keys:
  + : increase refresh interval
  - : decrease refresh interval
  d : toggle debug info
  c : run stress-ng cpu on one thread
  C : run stress-ng cpu on all threads
  m : run stress-ng matrix on one thread
  M : run stress-ng matrix on all threads
  r : reset min/max counters
  h : help
  q : quit
";

/// Refresh period adjusted by `+` and `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshInterval(Duration);

impl RefreshInterval {
    pub fn new(initial: Duration) -> Self {
        Self(initial.clamp(MIN_INTERVAL, MAX_INTERVAL))
    }

    pub fn get(&self) -> Duration {
        self.0
    }

    /// Double the period unless it already reached the upper bound.
    pub fn slow_down(&mut self) -> bool {
        if self.0 < MAX_INTERVAL {
            self.0 *= 2;
            return true;
        }
        false
    }

    /// Halve the period unless it already reached the lower bound.
    pub fn speed_up(&mut self) -> bool {
        if self.0 > MIN_INTERVAL {
            self.0 /= 2;
            return true;
        }
        false
    }
}

/// Block on terminal events forever.
///
/// Reset, diagnostics and stress keys are handled right here so they work
/// even while the refresh loop waits; everything else goes to `keys`.
pub fn spawn_key_thread(
    handle: MonitorHandle,
    monitor: MonitorConfig,
    runtime: Handle,
    keys: UnboundedSender<KeyAction>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(e) => {
                error!("Terminal input error: {}", e);
                let _ = keys.send(KeyAction::Quit);
                return;
            }
        };

        match map_key(key) {
            KeyAction::ToggleDiagnostics => {
                let on = handle.toggle_diagnostics();
                info!("Diagnostics {}", if on { "on" } else { "off" });
            }
            KeyAction::ResetStats => handle.reset_stats(),
            KeyAction::Stress(job) => stress::launch(
                &runtime,
                &monitor.stress_command,
                &monitor.stress_timeout,
                job,
            ),
            action => {
                if keys.send(action).is_err() {
                    return;
                }
            }
        }
    })
}
