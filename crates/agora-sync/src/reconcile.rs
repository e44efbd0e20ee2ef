//! Reconciliation schedule
//!
//! Drift checks run on an interval that starts long and shortens with every
//! `outOfSync` reply, then stops entirely. The hub only answers when counts
//! diverge, so a clean check is unobservable and strikes never reset; this is
//! a backoff-toward-giving-up policy, not retry-forever.

use std::time::Duration;

/// Interval while no drift has been observed
pub const HEALTHY_INTERVAL: Duration = Duration::from_secs(60);

/// Intervals after the first and second drift
pub const SUSPICIOUS_INTERVALS: [Duration; 2] = [Duration::from_secs(10), Duration::from_secs(5)];

/// Health of the client's view of the post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncHealth {
    /// No drift observed
    Healthy,
    /// Drift observed; checking more often
    Suspicious {
        /// How many drifts have been observed (1 or 2)
        strikes: u8,
    },
    /// Drift persisted through the whole schedule; reconciliation stopped
    Desynced,
}

/// Drives the adaptive reconcile timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSchedule {
    health: SyncHealth,
}

impl ReconcileSchedule {
    /// Start a fresh schedule
    #[must_use]
    pub fn new() -> Self {
        Self {
            health: SyncHealth::Healthy,
        }
    }

    /// Current health
    #[inline]
    pub fn health(&self) -> SyncHealth {
        self.health
    }

    /// Whether the schedule has given up
    #[inline]
    pub fn is_desynced(&self) -> bool {
        self.health == SyncHealth::Desynced
    }

    /// Time until the next check, or `None` once reconciliation has stopped
    pub fn interval(&self) -> Option<Duration> {
        match self.health {
            SyncHealth::Healthy => Some(HEALTHY_INTERVAL),
            SyncHealth::Suspicious { strikes } => SUSPICIOUS_INTERVALS
                .get(usize::from(strikes) - 1)
                .copied(),
            SyncHealth::Desynced => None,
        }
    }

    /// Record an `outOfSync` reply, advancing one step toward giving up
    ///
    /// Returns the new health.
    pub fn on_drift(&mut self) -> SyncHealth {
        self.health = match self.health {
            SyncHealth::Healthy => SyncHealth::Suspicious { strikes: 1 },
            SyncHealth::Suspicious { strikes } if usize::from(strikes) < SUSPICIOUS_INTERVALS.len() => {
                SyncHealth::Suspicious { strikes: strikes + 1 }
            }
            SyncHealth::Suspicious { .. } | SyncHealth::Desynced => SyncHealth::Desynced,
        };
        self.health
    }
}

impl Default for ReconcileSchedule {
    fn default() -> Self {
        Self::new()
    }
}
