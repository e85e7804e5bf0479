use std::time::{Duration, Instant};

use model::{ReplayController, ReplayState, Route};

use crate::controls::Command;
use crate::timer::TickTimer;

/// Drives a replay with a single timer. All state changes happen through `handle` and `poll`, so
/// the caller owns the clock.
pub struct Session {
    replay: ReplayController,
    timer: TickTimer,
}

impl Session {
    pub fn new(route: Route, tick_interval: Duration) -> Self {
        Self {
            replay: ReplayController::new(route),
            timer: TickTimer::new(tick_interval),
        }
    }

    pub fn replay(&self) -> &ReplayController {
        &self.replay
    }

    /// Applies a command from the control surface. Returns true if the replay state changed.
    pub fn handle(&mut self, cmd: Command, now: Instant) -> bool {
        let before = self.replay.state();
        match cmd {
            Command::Toggle => self.replay.toggle(),
            Command::Play => self.replay.play(),
            Command::Pause => self.replay.pause(),
            Command::Reset => self.replay.reset(),
            Command::Quit => {}
        }
        self.after_change(before, now)
    }

    /// Advances the replay if a tick is due. Returns true if the cursor moved.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.fire(now).is_none() {
            return false;
        }
        let before = self.replay.state();
        self.replay.tick();
        self.after_change(before, now)
    }

    /// When the next tick will happen, if one is scheduled
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Cancels any pending tick, leaving the replay state alone. Returns true if a tick was
    /// pending. Dropping the session does this too.
    pub fn cancel_pending(&mut self) -> bool {
        self.timer.cancel()
    }

    // Any change restarts the timer from scratch, so resuming always waits a full interval.
    fn after_change(&mut self, before: ReplayState, now: Instant) -> bool {
        let changed = self.replay.state() != before;
        if changed {
            self.timer.cancel();
        }
        if self.replay.wants_tick() {
            if !self.timer.is_pending() {
                self.timer.schedule(now);
            }
        } else {
            self.timer.cancel();
        }
        changed
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.cancel_pending() {
            debug!("Session ended with a tick still pending");
        }
    }
}
