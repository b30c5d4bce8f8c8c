//! Date gate deciding which sections of the site are shown.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use shared::domain::{EventConfig, LifecycleState, Visibility};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant. Used for `--at` previews.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Event passed → after; inside the lead window → closed; otherwise the
/// manual flag decides between open and before-open.
pub fn compute_state(config: &EventConfig, now: DateTime<Utc>) -> LifecycleState {
    if now >= config.event_starts_at() {
        LifecycleState::AfterEvent
    } else if now >= config.registration_closes_at() {
        LifecycleState::Closed
    } else if config.manually_opened {
        LifecycleState::Open
    } else {
        LifecycleState::BeforeOpen
    }
}

pub fn visibility(config: &EventConfig, now: DateTime<Utc>) -> Visibility {
    Visibility::from(compute_state(config, now))
}

/// Re-evaluates the gate on start and then every `period`, for pages left
/// open across a transition.
pub struct VisibilityWatcher {
    config: EventConfig,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl VisibilityWatcher {
    pub fn new(config: EventConfig, clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self {
            config,
            clock,
            period,
        }
    }

    /// Runs until every receiver is dropped.
    pub fn spawn(self) -> (watch::Receiver<Visibility>, JoinHandle<()>) {
        let initial = visibility(&self.config, self.clock.now());
        info!(state = %initial.state, "visibility: initial state");
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; the initial value is already published.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }

                let next = visibility(&self.config, self.clock.now());
                let changed = tx.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    info!(from = %current.state, to = %next.state, "visibility: state changed");
                    *current = next;
                    true
                });
                if !changed {
                    debug!(state = %next.state, "visibility: refreshed, unchanged");
                }
            }
        });

        (rx, handle)
    }
}

#[cfg(test)]
#[path = "tests/visibility_tests.rs"]
mod tests;
