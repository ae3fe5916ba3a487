//! Periodic refresh of the live feed and the limits figures.

use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::Console;
use crate::view::{MonitoringTab, View, ViewState};

/// Background task that re-fetches the polled panels while their view is
/// showing. Stops on [`stop`](Self::stop), on drop, or once the console
/// itself is dropped.
#[derive(Debug)]
pub struct RefreshLoop {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl RefreshLoop {
    /// Spawn onto the current tokio runtime. The first refresh happens one
    /// period after the call.
    pub fn spawn(console: &Arc<Console>) -> Self {
        let cancel = CancellationToken::new();
        let live_period = console.config().live_refresh();
        let limits_period = console.config().limits_refresh();
        let weak = Arc::downgrade(console);
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            info!(
                live_secs = live_period.as_secs(),
                limits_secs = limits_period.as_secs(),
                "refresh loop started"
            );
            let now = Instant::now();
            let mut live = interval_at(now + live_period, live_period);
            live.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut limits = interval_at(now + limits_period, limits_period);
            limits.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = live.tick() => {
                        let Some(console) = upgrade(&weak) else { break };
                        if live_feed_due(&console.state()) {
                            console.load_live_feed().await;
                        }
                    }
                    _ = limits.tick() => {
                        let Some(console) = upgrade(&weak) else { break };
                        if limits_due(&console.state()) {
                            console.refresh_limits().await;
                        }
                    }
                }
            }
            info!("refresh loop stopped");
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn upgrade(weak: &Weak<Console>) -> Option<Arc<Console>> {
    let console = weak.upgrade();
    if console.is_none() {
        debug!("console dropped, ending refresh loop");
    }
    console
}

/// The live feed polls only while it is on screen and not paused.
pub fn live_feed_due(state: &ViewState) -> bool {
    state.view == View::Monitoring
        && state.monitoring_tabs.active() == MonitoringTab::Live
        && !state.live_paused
}

pub fn limits_due(state: &ViewState) -> bool {
    state.view == View::Limits
}
