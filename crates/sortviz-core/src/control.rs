//! Shared run control state: pause, resume, cancel, and playback speed.
//!
//! A [`RunControl`] is wrapped in [`Arc`](std::sync::Arc) and shared between
//! the task driving a run and whatever owns the user controls. Every field
//! is read fresh at each step, so a speed change or a pause issued mid-run
//! applies to the very next step.
//!
//! # Architecture
//!
//! Flags are atomics so the hot path never takes a lock. A single
//! [`Notify`] wakes waiters whenever pause or cancellation changes; waiters
//! re-check the flags after every wake, so spurious wakes are harmless.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tokio::sync::Notify;
use tracing::debug;

/// Slowest playback speed.
pub const MIN_SPEED: u8 = 1;

/// Fastest playback speed.
pub const MAX_SPEED: u8 = 100;

/// Speed used when nothing else is configured.
pub const DEFAULT_SPEED: u8 = 50;

/// Pause, cancellation, and speed for the active run.
#[derive(Debug)]
pub struct RunControl {
    /// Whether playback is currently paused.
    paused: AtomicBool,

    /// Whether the active run has been asked to stop.
    cancelled: AtomicBool,

    /// Playback speed in `MIN_SPEED..=MAX_SPEED`.
    speed: AtomicU8,

    /// Wakes waiters when `paused` or `cancelled` changes.
    changed: Notify,
}

impl RunControl {
    /// Create control state with the given speed, clamped into range.
    pub fn new(speed: u8) -> Self {
        Self {
            paused: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            speed: AtomicU8::new(speed.clamp(MIN_SPEED, MAX_SPEED)),
            changed: Notify::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether playback is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause playback. The step clock holds the run at its next wait.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
        debug!("playback paused");
        self.changed.notify_waiters();
    }

    /// Resume playback and wake the step clock.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        debug!("playback resumed");
        self.changed.notify_waiters();
    }

    /// Flip between paused and playing. Returns the new paused state.
    pub fn toggle_pause(&self) -> bool {
        if self.is_paused() {
            self.resume();
            false
        } else {
            self.pause();
            true
        }
    }

    /// Wait until playback is no longer paused, or the run is cancelled.
    ///
    /// Returns immediately if not paused.
    pub async fn wait_while_paused(&self) {
        self.wait_until(|c| !c.is_paused() || c.is_cancelled()).await;
    }

    /// Resolve once playback becomes paused or the run is cancelled.
    pub async fn paused_or_cancelled(&self) {
        self.wait_until(|c| c.is_paused() || c.is_cancelled()).await;
    }

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------

    /// Ask the active run to stop at its next checkpoint.
    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        debug!("run cancellation requested");
        self.changed.notify_waiters();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Resolve once cancellation has been requested.
    pub async fn cancelled(&self) {
        self.wait_until(Self::is_cancelled).await;
    }

    /// Clear cancellation before a new run starts.
    ///
    /// Pause and speed belong to the user's controls and carry over.
    pub fn reset_for_run(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    // -----------------------------------------------------------------------
    // Speed
    // -----------------------------------------------------------------------

    /// Current playback speed.
    pub fn speed(&self) -> u8 {
        self.speed.load(Ordering::Acquire)
    }

    /// Set the playback speed.
    ///
    /// Returns the previous speed on success, or `None` if the value was
    /// rejected (outside `1..=100`).
    pub fn set_speed(&self, speed: u8) -> Option<u8> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return None;
        }
        let prev = self.speed.swap(speed, Ordering::AcqRel);
        debug!(speed, prev, "playback speed changed");
        Some(prev)
    }

    /// Shift the speed by `delta`, saturating at the ends of the range.
    /// Returns the new speed.
    pub fn adjust_speed(&self, delta: i16) -> u8 {
        let current = i16::from(self.speed());
        let target = current
            .saturating_add(delta)
            .clamp(i16::from(MIN_SPEED), i16::from(MAX_SPEED));
        let speed = u8::try_from(target).unwrap_or(DEFAULT_SPEED);
        let _ = self.set_speed(speed);
        speed
    }

    // -----------------------------------------------------------------------
    // Waiting
    // -----------------------------------------------------------------------

    /// Wait until `ready` holds, re-checking after every state change.
    async fn wait_until(&self, ready: impl Fn(&Self) -> bool) {
        loop {
            // Register interest before checking, so a change that lands
            // between the check and the await is not missed.
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if ready(self) {
                return;
            }
            notified.await;
        }
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}
