//! Countdown driver background task

use std::time::Duration;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

/// Period between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Calls a tick handler once per second while a running flag is set.
///
/// Dropping the driver aborts its task.
#[derive(Debug)]
pub struct CountdownDriver {
    handle: JoinHandle<()>,
}

impl CountdownDriver {
    /// Spawn the driver on the current tokio runtime
    pub fn spawn<F>(name: impl Into<String>, running_rx: watch::Receiver<bool>, on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let name = name.into();
        let handle = tokio::spawn(countdown_task(name, running_rx, on_tick));
        Self { handle }
    }

    /// Stop driving ticks
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn countdown_task<F>(name: String, mut running_rx: watch::Receiver<bool>, mut on_tick: F)
where
    F: FnMut(),
{
    info!("Starting {} countdown driver", name);

    loop {
        let running = *running_rx.borrow_and_update();

        if !running {
            // Idle until the flag changes
            if running_rx.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("{} countdown scheduled", name);
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    on_tick();
                }

                changed = running_rx.changed() => {
                    if changed.is_err() {
                        info!("{} countdown driver stopped", name);
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("{} countdown cancelled", name);
                        break;
                    }
                }
            }
        }
    }

    info!("{} countdown driver stopped", name);
}
