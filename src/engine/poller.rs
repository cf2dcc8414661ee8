use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::engine::error::GatewayError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Handed out when a tick fires. The answer to that tick must come back with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Idle,
    Polling { next_tick: Instant, in_flight: bool },
}

/// Tracks whether the backend is still materializing world changes after the last
/// input, and when to ask again.
///
/// The repeating timer is a deadline checked by the owner (once per frame). Each
/// `start` opens a new generation; answers to tickets from an older generation are
/// dropped, so at most one timer is ever live for a session.
#[derive(Debug)]
pub struct PendingPoller {
    interval: Duration,
    state: PollState,
    generation: u64,
    pending: bool,
}

impl Default for PendingPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl PendingPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: PollState::Idle,
            generation: 0,
            pending: false,
        }
    }

    /// Arm a fresh cycle, replacing any running one. The flag is raised immediately.
    pub fn start(&mut self, now: Instant) {
        self.cancel();
        self.generation += 1;
        self.pending = true;
        self.state = PollState::Polling {
            next_tick: now + self.interval,
            in_flight: false,
        };
        debug!("pending poller armed (generation {})", self.generation);
    }

    /// Stop the timer. Safe to call any number of times.
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("pending poller cancelled (generation {})", self.generation);
        }
        self.state = PollState::Idle;
    }

    /// Fires the timer if its deadline has passed and no query is outstanding.
    pub fn tick(&mut self, now: Instant) -> Option<PollTicket> {
        match &mut self.state {
            PollState::Polling {
                next_tick,
                in_flight,
            } if !*in_flight && now >= *next_tick => {
                *in_flight = true;
                Some(PollTicket(self.generation))
            }
            _ => None,
        }
    }

    /// Feed back the answer for a ticket returned by [`tick`](Self::tick).
    pub fn on_result(
        &mut self,
        ticket: PollTicket,
        result: Result<bool, GatewayError>,
        now: Instant,
    ) {
        if ticket.0 != self.generation || !self.is_active() {
            debug!("ignoring stale pending-entities answer");
            return;
        }
        match result {
            Ok(true) => {
                self.state = PollState::Polling {
                    next_tick: now + self.interval,
                    in_flight: false,
                };
            }
            Ok(false) => self.finish(),
            Err(e) => {
                warn!("pending-entities check failed, stopping poll: {e}");
                self.finish();
            }
        }
    }

    fn finish(&mut self) {
        self.pending = false;
        self.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PollState::Polling { .. })
    }

    /// How long until the next tick is due, for scheduling a repaint.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        match self.state {
            PollState::Polling {
                next_tick,
                in_flight: false,
            } => Some(next_tick.saturating_duration_since(now)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poller() -> (PendingPoller, Instant) {
        (PendingPoller::new(Duration::from_secs(1)), Instant::now())
    }

    #[test]
    fn starts_idle() {
        let (mut p, t0) = poller();
        assert!(!p.is_active());
        assert!(!p.is_pending());
        assert_eq!(p.tick(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn start_raises_flag_and_ticks_after_interval() {
        let (mut p, t0) = poller();
        p.start(t0);
        assert!(p.is_pending());
        assert_eq!(p.tick(t0 + Duration::from_millis(999)), None);
        assert!(p.tick(t0 + Duration::from_secs(1)).is_some());
    }

    #[test]
    fn keeps_polling_while_backend_reports_pending() {
        let (mut p, t0) = poller();
        p.start(t0);
        let t1 = t0 + Duration::from_secs(1);
        let ticket = p.tick(t1).unwrap();
        // A second tick is not issued while the first is unanswered.
        assert_eq!(p.tick(t1 + Duration::from_secs(3)), None);
        p.on_result(ticket, Ok(true), t1);
        assert!(p.is_active());
        assert!(p.is_pending());
        assert_eq!(p.tick(t1 + Duration::from_millis(500)), None);
        assert!(p.tick(t1 + Duration::from_secs(1)).is_some());
    }

    #[test]
    fn stops_when_backend_reports_done() {
        let (mut p, t0) = poller();
        p.start(t0);
        let t1 = t0 + Duration::from_secs(1);
        let ticket = p.tick(t1).unwrap();
        p.on_result(ticket, Ok(false), t1);
        assert!(!p.is_active());
        assert!(!p.is_pending());
        assert_eq!(p.tick(t1 + Duration::from_secs(10)), None);
    }

    #[test]
    fn query_failure_goes_idle_on_that_tick() {
        let (mut p, t0) = poller();
        p.start(t0);
        let t1 = t0 + Duration::from_secs(1);
        let ticket = p.tick(t1).unwrap();
        p.on_result(ticket, Err(GatewayError::Unreachable("down".into())), t1);
        assert!(!p.is_active());
        assert!(!p.is_pending());
        assert_eq!(p.time_until_tick(t1), None);
    }

    #[test]
    fn restart_leaves_one_timer_and_single_cancel_stops_it() {
        let (mut p, t0) = poller();
        p.start(t0);
        let stale = p.tick(t0 + Duration::from_secs(1)).unwrap();
        p.start(t0 + Duration::from_millis(1500));
        assert!(p.is_active());

        // The superseded cycle's answer changes nothing.
        p.on_result(stale, Ok(false), t0 + Duration::from_millis(1600));
        assert!(p.is_active());
        assert!(p.is_pending());

        p.cancel();
        assert!(!p.is_active());
        assert_eq!(p.tick(t0 + Duration::from_secs(60)), None);
    }

    #[test]
    fn cancel_is_idempotent() {
        let (mut p, t0) = poller();
        p.cancel();
        p.start(t0);
        p.cancel();
        p.cancel();
        assert!(!p.is_active());
    }

    #[test]
    fn answer_after_teardown_is_ignored() {
        let (mut p, t0) = poller();
        p.start(t0);
        let ticket = p.tick(t0 + Duration::from_secs(1)).unwrap();
        p.cancel();
        p.on_result(ticket, Ok(true), t0 + Duration::from_secs(2));
        assert!(!p.is_active());
    }

    #[test]
    fn time_until_tick_tracks_deadline() {
        let (mut p, t0) = poller();
        p.start(t0);
        assert_eq!(
            p.time_until_tick(t0 + Duration::from_millis(250)),
            Some(Duration::from_millis(750))
        );
        assert_eq!(
            p.time_until_tick(t0 + Duration::from_secs(2)),
            Some(Duration::ZERO)
        );
    }
}
