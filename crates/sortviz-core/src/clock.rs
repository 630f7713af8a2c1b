//! Step clock: converts playback speed into a per-step delay and waits it
//! out, honoring pause and cancellation.
//!
//! # Design Principles
//!
//! - The delay is `101 - speed` milliseconds: speed 100 waits 1ms, speed 1
//!   waits 100ms. Speed is read when each wait starts, never cached.
//! - While paused no delay elapses. The wait parks on the control's change
//!   notification and restarts the full delay once playback resumes.
//! - Cancellation ends a wait early. Callers must re-check cancellation
//!   after every wait.

use std::time::Duration;

use tracing::trace;

use crate::control::{MAX_SPEED, MIN_SPEED, RunControl};

/// Delay added on top of the fastest speed: `DELAY_BASE_MS - speed`.
const DELAY_BASE_MS: u64 = 101;

/// How a step wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full delay elapsed while playing.
    Elapsed,
    /// Cancellation was requested before the delay elapsed.
    Cancelled,
}

/// Compute the per-step delay for a playback speed.
///
/// Speeds outside `1..=100` are clamped first.
pub fn delay_for_speed(speed: u8) -> Duration {
    let speed = u64::from(speed.clamp(MIN_SPEED, MAX_SPEED));
    Duration::from_millis(DELAY_BASE_MS.saturating_sub(speed))
}

/// Paces a run between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepClock {
    /// Whether steps wait for the speed-derived delay at all.
    paced: bool,
}

impl StepClock {
    /// A clock that waits `101 - speed` milliseconds per step.
    pub const fn paced() -> Self {
        Self { paced: true }
    }

    /// A clock that never sleeps but still yields to the scheduler, holds
    /// while paused, and observes cancellation. Used for headless runs.
    pub const fn unpaced() -> Self {
        Self { paced: false }
    }

    /// Whether this clock sleeps between steps.
    pub const fn is_paced(&self) -> bool {
        self.paced
    }

    /// Delay for the next step at the current speed.
    pub fn next_delay(&self, control: &RunControl) -> Duration {
        if self.paced {
            delay_for_speed(control.speed())
        } else {
            Duration::ZERO
        }
    }

    /// Wait until the next step is due.
    ///
    /// Returns [`WaitOutcome::Cancelled`] as soon as cancellation is
    /// observed, including while paused.
    pub async fn wait(&self, control: &RunControl) -> WaitOutcome {
        loop {
            control.wait_while_paused().await;
            if control.is_cancelled() {
                return WaitOutcome::Cancelled;
            }

            let delay = self.next_delay(control);
            trace!(delay_ms = delay.as_millis(), "step wait");
            if delay.is_zero() {
                // Let control and renderer tasks run between steps.
                tokio::task::yield_now().await;
                if control.is_cancelled() {
                    return WaitOutcome::Cancelled;
                }
                return WaitOutcome::Elapsed;
            }

            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    if control.is_cancelled() {
                        return WaitOutcome::Cancelled;
                    }
                    // Paused as the delay ran out: hold this step as well.
                    if !control.is_paused() {
                        return WaitOutcome::Elapsed;
                    }
                }
                // Paused or cancelled mid-delay: the loop decides which.
                () = control.paused_or_cancelled() => {}
            }
        }
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::paced()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;

    #[test]
    fn speed_maps_to_delay() {
        assert_eq!(delay_for_speed(100), Duration::from_millis(1));
        assert_eq!(delay_for_speed(1), Duration::from_millis(100));
        assert_eq!(delay_for_speed(50), Duration::from_millis(51));
    }

    #[test]
    fn out_of_range_speed_is_clamped() {
        assert_eq!(delay_for_speed(0), Duration::from_millis(100));
        assert_eq!(delay_for_speed(200), Duration::from_millis(1));
    }

    #[test]
    fn unpaced_clock_has_no_delay() {
        let control = RunControl::new(1);
        assert_eq!(StepClock::unpaced().next_delay(&control), Duration::ZERO);
        assert_eq!(StepClock::paced().next_delay(&control), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_speed_delay() {
        let control = RunControl::new(1);
        let start = Instant::now();
        let outcome = StepClock::paced().wait(&control).await;
        assert_eq!(outcome, WaitOutcome::Elapsed);
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn speed_is_read_fresh_each_step() {
        let control = RunControl::new(1);
        let clock = StepClock::paced();

        let start = Instant::now();
        let _ = clock.wait(&control).await;
        assert_eq!(start.elapsed(), Duration::from_millis(100));

        let _ = control.set_speed(100);
        let start = Instant::now();
        let _ = clock.wait(&control).await;
        assert_eq!(start.elapsed(), Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_cuts_the_wait_short() {
        let control = Arc::new(RunControl::new(1));
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { StepClock::paced().wait(&control).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let start = Instant::now();
        control.request_cancel();
        let outcome = waiter.await.ok();
        assert_eq!(outcome, Some(WaitOutcome::Cancelled));
        assert!(start.elapsed() < Duration::from_millis(90));
    }

    #[tokio::test(start_paused = true)]
    async fn no_time_elapses_while_paused() {
        let control = Arc::new(RunControl::new(100));
        control.pause();
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { StepClock::paced().wait(&control).await })
        };

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!waiter.is_finished());

        control.resume();
        let outcome = waiter.await.ok();
        assert_eq!(outcome, Some(WaitOutcome::Elapsed));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_mid_delay_restarts_the_delay_after_resume() {
        let control = Arc::new(RunControl::new(1));
        let start = Instant::now();
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { StepClock::paced().wait(&control).await })
        };

        tokio::time::sleep(Duration::from_millis(40)).await;
        control.pause();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!waiter.is_finished());

        control.resume();
        let outcome = waiter.await.ok();
        assert_eq!(outcome, Some(WaitOutcome::Elapsed));
        // 40ms before the pause, 500ms paused, then a fresh 100ms delay.
        assert_eq!(start.elapsed(), Duration::from_millis(640));
    }

    #[tokio::test]
    async fn unpaced_clock_still_observes_cancellation() {
        let control = RunControl::default();
        control.request_cancel();
        assert_eq!(StepClock::unpaced().wait(&control).await, WaitOutcome::Cancelled);
    }
}
