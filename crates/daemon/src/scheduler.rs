//! Tick scheduler that drives one terminal on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use terminal_sync_core::endpoint::TextEndpoint;
use terminal_sync_core::sync::{SyncOutcome, Terminal};

/// Aggregate counts across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickStats {
    pub total_ticks: u64,
    pub no_change: u64,
    pub rejected: u64,
    pub accepted: u64,
    pub synchronized: u64,
    pub endpoint_errors: u64,
    pub consecutive_errors: u64,
}

impl TickStats {
    fn record(&mut self, outcome: &SyncOutcome) {
        self.consecutive_errors = 0;
        match outcome {
            SyncOutcome::NoChange => self.no_change += 1,
            SyncOutcome::Rejected(_) => self.rejected += 1,
            SyncOutcome::Accepted => self.accepted += 1,
            SyncOutcome::Synchronized => self.synchronized += 1,
        }
    }
}

/// The tick scheduler.
///
/// Calls [`Terminal::tick`] once per interval. Ticks that fall behind are
/// skipped rather than bunched up, since each tick reconciles the latest
/// snapshot anyway.
pub struct Scheduler<E: TextEndpoint> {
    terminal: Terminal<E>,
    interval: Duration,
    stats: TickStats,
    /// Whether the previous tick was rejected, to log only the first of a streak.
    last_rejected: bool,
}

impl<E: TextEndpoint> Scheduler<E> {
    pub fn new(terminal: Terminal<E>, interval: Duration) -> Self {
        Self {
            terminal,
            interval,
            stats: TickStats::default(),
            last_rejected: false,
        }
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn terminal(&self) -> &Terminal<E> {
        &self.terminal
    }

    /// Main scheduler loop. Returns once `shutdown` is notified.
    pub async fn run(&mut self, shutdown: Arc<Notify>) {
        info!(
            tick_interval_ms = self.interval.as_millis() as u64,
            "scheduler started"
        );

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_tick();
                }
                _ = shutdown.notified() => {
                    info!(
                        ticks = self.stats.total_ticks,
                        accepted = self.stats.accepted,
                        synchronized = self.stats.synchronized,
                        rejected = self.stats.rejected,
                        endpoint_errors = self.stats.endpoint_errors,
                        "scheduler stopping"
                    );
                    return;
                }
            }
        }
    }

    /// Run a single tick and fold its result into the stats.
    pub fn run_tick(&mut self) {
        self.stats.total_ticks += 1;
        let tick = self.stats.total_ticks;

        match self.terminal.tick() {
            Ok(outcome) => {
                match &outcome {
                    SyncOutcome::NoChange => debug!(tick, "no change"),
                    // A human may sit on a half-typed edit for many ticks.
                    SyncOutcome::Rejected(e) if !self.last_rejected => {
                        warn!(tick, error = %e, "external text rejected, waiting for a valid edit")
                    }
                    SyncOutcome::Rejected(_) => debug!(tick, "external text still rejected"),
                    SyncOutcome::Accepted => info!(tick, "external edit accepted"),
                    SyncOutcome::Synchronized => info!(tick, "external text synchronized"),
                }
                self.last_rejected = matches!(outcome, SyncOutcome::Rejected(_));
                self.stats.record(&outcome);
            }
            Err(e) => {
                self.stats.endpoint_errors += 1;
                self.stats.consecutive_errors += 1;
                error!(
                    tick,
                    error = %e,
                    total_errors = self.stats.endpoint_errors,
                    consecutive_errors = self.stats.consecutive_errors,
                    "tick failed"
                );

                if self.stats.consecutive_errors == 1 {
                    self.terminal.packet_mut().flag_error(e.to_string());
                    if let Err(push_err) = self.terminal.push() {
                        warn!(error = %push_err, "could not publish error to endpoint");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terminal_sync_core::endpoint::{FileEndpoint, MemoryEndpoint};
    use terminal_sync_core::packet::Packet;

    fn scheduler(external: &str) -> Scheduler<MemoryEndpoint> {
        let terminal = Terminal::new(MemoryEndpoint::new(external));
        Scheduler::new(terminal, Duration::from_millis(10))
    }

    #[test]
    fn test_run_tick_counts_outcomes() {
        let mut sched = scheduler(&Packet::new().serialize());
        sched.run_tick();
        sched.run_tick();
        assert_eq!(sched.stats().total_ticks, 2);
        assert_eq!(sched.stats().no_change, 2);

        let mut sched = scheduler("garbage {{{");
        sched.run_tick();
        sched.run_tick();
        assert_eq!(sched.stats().rejected, 2);
        assert!(sched.terminal().endpoint().writes().is_empty());
    }

    #[test]
    fn test_endpoint_error_is_flagged_once_per_streak() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("custom_data.ini");
        let endpoint = FileEndpoint::new(path).require_existing();
        let mut sched = Scheduler::new(Terminal::new(endpoint), Duration::from_millis(10));

        sched.run_tick();
        sched.run_tick();

        assert_eq!(sched.stats().endpoint_errors, 2);
        assert_eq!(sched.stats().consecutive_errors, 2);
        assert_eq!(sched.terminal().packet().error_count(), 1);
        assert!(sched.terminal().packet().last_error().contains("custom_data.ini"));
    }

    #[test]
    fn test_flagged_error_is_published_and_ticks_recover() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_data.ini");
        let endpoint = FileEndpoint::new(&path).require_existing();
        let mut sched = Scheduler::new(Terminal::new(endpoint), Duration::from_millis(10));

        sched.run_tick();
        assert_eq!(sched.stats().endpoint_errors, 1);
        let published = std::fs::read_to_string(&path).unwrap();
        assert!(published.contains("ErrorCount=1"));

        sched.run_tick();
        assert_eq!(sched.stats().consecutive_errors, 0);
        assert_eq!(sched.stats().no_change, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut sched = scheduler("");
        let shutdown = Arc::new(Notify::new());
        shutdown.notify_one();
        sched.run(shutdown).await;
        assert_eq!(sched.stats().endpoint_errors, 0);
    }
}
