//! Backend connection monitoring.
//!
//! [`ConnectionMonitor`] polls a [`HealthProbe`] on a fixed period and
//! publishes a tri-state [`ConnectionStatus`]. Activation spawns the polling
//! task and returns a [`MonitorHandle`]; dropping or shutting down the handle
//! aborts the task, after which no further probe runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default polling period (30 seconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest period the monitor will poll at.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Backend reachability as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// A probe is in flight (or none has completed yet).
    #[default]
    Checking,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Checking => "checking",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        };
        f.pad(label)
    }
}

/// Status plus the time of the last successful probe.
///
/// `last_success` survives later failures so a view can show "last seen".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthSnapshot {
    pub status: ConnectionStatus,
    pub last_success: Option<DateTime<Utc>>,
}

/// Something that can answer "is the backend up?".
///
/// Error detail is deliberately reduced to a boolean.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> bool;
}

/// Periodic health poller. Inert until [`activate`](Self::activate)d.
pub struct ConnectionMonitor {
    probe: Arc<dyn HealthProbe>,
    interval: Duration,
}

impl ConnectionMonitor {
    /// Create a monitor polling `probe` every `interval`.
    ///
    /// A zero interval is raised to one millisecond.
    pub fn new(probe: Arc<dyn HealthProbe>, interval: Duration) -> Self {
        Self {
            probe,
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the polling task. The first probe runs immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(self) -> MonitorHandle {
        let (status_tx, status_rx) = watch::channel(HealthSnapshot::default());
        let Self { probe, interval } = self;

        let task = tokio::spawn(async move {
            tracing::info!("Connection monitor started (interval: {:?})", interval);

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut settled: Option<ConnectionStatus> = None;

            loop {
                ticker.tick().await;

                status_tx.send_modify(|snapshot| snapshot.status = ConnectionStatus::Checking);
                let healthy = probe.probe().await;

                let status = if healthy {
                    ConnectionStatus::Connected
                } else {
                    ConnectionStatus::Disconnected
                };
                status_tx.send_modify(|snapshot| {
                    snapshot.status = status;
                    if healthy {
                        snapshot.last_success = Some(Utc::now());
                    }
                });

                match settled {
                    Some(previous) if previous == status => {
                        tracing::trace!("Backend still {}", status);
                    }
                    _ if healthy => tracing::info!("Backend connected"),
                    _ => tracing::debug!("Backend health probe failed"),
                }
                settled = Some(status);
            }
        });

        MonitorHandle {
            status: status_rx,
            task: Some(task),
        }
    }
}

/// Owner of an active monitor. Dropping it stops polling.
#[derive(Debug)]
pub struct MonitorHandle {
    status: watch::Receiver<HealthSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Latest snapshot. Still readable after shutdown.
    pub fn status(&self) -> HealthSnapshot {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.status.clone()
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the polling task. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Connection monitor stopped");
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
