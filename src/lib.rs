pub mod collectors;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod stress;
pub mod utils;

use crate::collectors::collector::Monitor;
use crate::config::AppConfig;
use crate::input::{KeyAction, RefreshInterval, HELP};
use anyhow::Context;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use log::{debug, error, info};
use std::io::{self, Write};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Print one report to stdout and return.
pub fn run_batch(config: &AppConfig) -> anyhow::Result<()> {
    let mut monitor = Monitor::new(config.paths.clone()).context("Failed to initialise monitor")?;
    let report = monitor.render_report().context("Failed to collect report")?;
    print!("{}", report);
    io::stdout().flush()?;
    Ok(())
}

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting monitor");

    let result = main_loop(config).await;
    match &result {
        Ok(_) => info!("Monitor stopped"),
        Err(e) => {
            error!("Monitor error: {e:#}");
            // Print chain of error causes
            let mut source = e.source();
            while let Some(e) = source {
                error!("Caused by: {e}");
                source = e.source();
            }
        }
    }
    result
}

/// Puts the terminal back the way we found it, even on early return.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), Hide).context("Failed to hide cursor")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
        let _ = disable_raw_mode();
    }
}

/// Raw mode does not translate `\n`, so every line needs its own `\r`.
fn draw(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    stdout.write_all(text.replace('\n', "\r\n").as_bytes())?;
    stdout.flush()
}

async fn main_loop(config: AppConfig) -> anyhow::Result<()> {
    debug!("Resolving root device and opening collectors");
    let mut monitor = Monitor::new(config.paths.clone()).context("Failed to initialise monitor")?;

    let _guard = TerminalGuard::enter()?;
    let (keys_tx, mut keys_rx) = mpsc::unbounded_channel();
    input::spawn_key_thread(
        monitor.handle(),
        config.monitor.clone(),
        tokio::runtime::Handle::current(),
        keys_tx,
    );
    let mut terminate = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    let mut period = RefreshInterval::new(config.monitor.interval());
    let mut ticker = interval_at(Instant::now() + period.get(), period.get());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let report = monitor.render_report().context("Failed to collect report")?;
        draw(&format!(
            "{} Refresh Interval: {:?} (? for more options)\n\n{}",
            chrono::Local::now().format("%H:%M:%S"),
            period.get(),
            report
        ))?;

        tokio::select! {
            _ = ticker.tick() => {}
            _ = terminate.recv() => {
                info!("Received SIGTERM");
                return Ok(());
            }
            key = keys_rx.recv() => {
                let Some(action) = key else {
                    return Ok(());
                };
                let changed = match action {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::SlowDown => period.slow_down(),
                    KeyAction::SpeedUp => period.speed_up(),
                    KeyAction::Help => {
                        draw(HELP)?;
                        if keys_rx.recv().await.is_none() {
                            return Ok(());
                        }
                        false
                    }
                    _ => false,
                };
                if changed {
                    debug!("Refresh interval now {:?}", period.get());
                    ticker = interval_at(Instant::now() + period.get(), period.get());
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                }
            }
        }
    }
}
