//! Availability poller: "wait for readiness with bounded retries".
//!
//! The poller owns a small state machine:
//!
//! ```text
//! Polling(n) --probe empty, n < max--> Polling(n + 1)   (one delay awaited)
//! Polling(n) --probe ready----------> Ready
//! Polling(max) --probe empty--------> Exhausted         (reported once)
//! ```
//!
//! Neither terminal state is ever left. Sleeping goes through [`Sleeper`] so
//! native tests can drive it without a browser timer.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay_ms: u32) -> Self {
        Self { max_attempts, delay_ms }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollPhase {
    Polling(u32),
    Ready,
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollState {
    /// Retries scheduled so far.
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub ready: bool,
}

impl PollState {
    pub fn new(max_attempts: u32) -> Self {
        Self { attempts_made: 0, max_attempts, ready: false }
    }

    pub fn phase(&self) -> PollPhase {
        if self.ready {
            PollPhase::Ready
        } else if self.attempts_made >= self.max_attempts {
            PollPhase::Exhausted
        } else {
            PollPhase::Polling(self.attempts_made)
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.phase(), PollPhase::Polling(_))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    Exhausted,
    Cancelled,
    /// This poller already reached `Ready` on an earlier call.
    AlreadyReady,
}

/// Async delay source.
pub trait Sleeper {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;
}

/// Browser timer (`setTimeout` under the hood).
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerSleeper;

impl Sleeper for TimerSleeper {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        gloo_timers::future::TimeoutFuture::new(ms)
    }
}

/// Shared cancel flag; clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.set(true);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

pub struct Poller<S: Sleeper> {
    policy: RetryPolicy,
    state: PollState,
    sleeper: S,
    cancel: CancelToken,
    reported: bool,
    label: &'static str,
}

impl<S: Sleeper> Poller<S> {
    pub fn new(policy: RetryPolicy, sleeper: S, cancel: CancelToken) -> Self {
        Self {
            policy,
            state: PollState::new(policy.max_attempts),
            sleeper,
            cancel,
            reported: false,
            label: "catalog",
        }
    }

    /// Name used in log lines.
    pub fn labelled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Check `probe`, retrying after `delay_ms` until it yields a value or the
    /// budget runs out. A probe that is already ready costs no delay.
    pub async fn poll_until<T, F>(&mut self, mut probe: F) -> PollOutcome<T>
    where
        F: FnMut() -> Option<T>,
    {
        loop {
            if self.cancel.is_cancelled() {
                log::debug!("{} poll cancelled after {} retries", self.label, self.state.attempts_made);
                return PollOutcome::Cancelled;
            }
            if self.state.ready {
                return PollOutcome::AlreadyReady;
            }
            if self.reported {
                return PollOutcome::Exhausted;
            }
            if let Some(value) = probe() {
                self.state.ready = true;
                log::info!("{} ready after {} retries", self.label, self.state.attempts_made);
                return PollOutcome::Ready(value);
            }
            if self.state.attempts_made >= self.policy.max_attempts {
                self.report_exhausted();
                return PollOutcome::Exhausted;
            }
            self.state.attempts_made += 1;
            log::debug!(
                "{} not ready, retry {}/{} in {}ms",
                self.label,
                self.state.attempts_made,
                self.policy.max_attempts,
                self.policy.delay_ms
            );
            self.sleeper.sleep(self.policy.delay_ms).await;
        }
    }

    fn report_exhausted(&mut self) {
        if !self.reported {
            self.reported = true;
            log::error!("{} never became available ({} retries)", self.label, self.state.attempts_made);
        }
    }

    /// True once the terminal failure has been logged.
    pub fn reported_exhausted(&self) -> bool {
        self.reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<u32>>>);

    impl Sleeper for Recorder {
        fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
            self.0.borrow_mut().push(ms);
            std::future::ready(())
        }
    }

    #[test]
    fn test_ready_immediately_costs_nothing() {
        let rec = Recorder::default();
        let mut p = Poller::new(RetryPolicy::new(30, 200), rec.clone(), CancelToken::new());
        assert_eq!(block_on(p.poll_until(|| Some(7))), PollOutcome::Ready(7));
        assert!(rec.0.borrow().is_empty());
        assert_eq!(p.state().phase(), PollPhase::Ready);
    }

    #[test]
    fn test_ready_is_terminal() {
        let rec = Recorder::default();
        let mut p = Poller::new(RetryPolicy::new(30, 200), rec.clone(), CancelToken::new());
        assert_eq!(block_on(p.poll_until(|| Some(1))), PollOutcome::Ready(1));
        let again = block_on(p.poll_until(|| -> Option<u8> { panic!("probed after ready") }));
        assert_eq!(again, PollOutcome::AlreadyReady);
        assert_eq!(p.state().attempts_made, 0);
        assert!(rec.0.borrow().is_empty());
    }

    #[test]
    fn test_exhausts_after_budget_and_reports_once() {
        let rec = Recorder::default();
        let mut p = Poller::new(RetryPolicy::new(10, 500), rec.clone(), CancelToken::new());
        let mut checks = 0;
        let out = block_on(p.poll_until(|| {
            checks += 1;
            None::<()>
        }));
        assert_eq!(out, PollOutcome::Exhausted);
        assert_eq!(*rec.0.borrow(), vec![500; 10]);
        assert_eq!(checks, 11);
        assert!(p.reported_exhausted());

        // terminal: no further sleeps or probes
        let out = block_on(p.poll_until(|| -> Option<()> { panic!("probed after exhaustion") }));
        assert_eq!(out, PollOutcome::Exhausted);
        assert_eq!(rec.0.borrow().len(), 10);
    }

    #[test]
    fn test_zero_budget_checks_once() {
        let rec = Recorder::default();
        let mut p = Poller::new(RetryPolicy::new(0, 200), rec.clone(), CancelToken::new());
        let mut checks = 0;
        let out = block_on(p.poll_until(|| {
            checks += 1;
            None::<u8>
        }));
        assert_eq!(out, PollOutcome::Exhausted);
        assert_eq!(checks, 1);
        assert!(rec.0.borrow().is_empty());
    }

    #[test]
    fn test_cancel_stops_before_next_check() {
        let cancel = CancelToken::new();
        let rec = Recorder::default();
        let mut p = Poller::new(RetryPolicy::new(30, 200), rec.clone(), cancel.clone());
        let mut checks = 0;
        let out = block_on(p.poll_until(|| {
            checks += 1;
            if checks == 2 {
                cancel.cancel();
            }
            None::<()>
        }));
        assert_eq!(out, PollOutcome::Cancelled);
        assert_eq!(checks, 2);
        assert!(!p.reported_exhausted());
    }

    #[test]
    fn test_phase_transitions() {
        let mut s = PollState::new(2);
        assert_eq!(s.phase(), PollPhase::Polling(0));
        s.attempts_made = 2;
        assert_eq!(s.phase(), PollPhase::Exhausted);
        assert!(s.is_terminal());
        s.ready = true;
        assert_eq!(s.phase(), PollPhase::Ready);
    }
}
