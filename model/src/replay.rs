use serde::{Deserialize, Serialize};

use crate::{speed, Route, Sample};

/// Where the replay is, and whether it's advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayState {
    // Always 0 for an empty route, otherwise a valid index
    pub cursor: usize,
    // Only true for routes with at least 2 samples
    pub running: bool,
}

/// Steps a cursor through a route. Something external decides when to `tick`; this only tracks
/// the state, and none of the operations can fail.
///
/// Reaching the last sample while running doesn't pause. The controller stays running, but
/// `wants_tick` becomes false and further ticks do nothing.
pub struct ReplayController {
    route: Route,
    state: ReplayState,
}

impl ReplayController {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            state: ReplayState {
                cursor: 0,
                running: false,
            },
        }
    }

    /// Replaces the route entirely, starting over at the beginning.
    pub fn reload(&mut self, route: Route) {
        info!("Loaded a route with {} samples", route.len());
        *self = Self::new(route);
    }

    /// Starts running, unless there's nowhere left to go.
    pub fn play(&mut self) {
        if self.state.running {
            return;
        }
        if !self.can_advance() {
            debug!(
                "Not playing; cursor {} is at the end of a route with {} samples",
                self.state.cursor,
                self.route.len()
            );
            return;
        }
        self.state.running = true;
        info!("Playing from sample {}", self.state.cursor);
    }

    pub fn pause(&mut self) {
        if self.state.running {
            self.state.running = false;
            info!("Paused at sample {}", self.state.cursor);
        }
    }

    pub fn reset(&mut self) {
        self.state = ReplayState {
            cursor: 0,
            running: false,
        };
        info!("Reset to the start");
    }

    /// The play/pause button
    pub fn toggle(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advances one sample. Returns true if the cursor moved.
    pub fn tick(&mut self) -> bool {
        if !self.wants_tick() {
            return false;
        }
        self.state.cursor += 1;
        debug!("Advanced to sample {}", self.state.cursor);
        true
    }

    /// True if the caller should schedule another tick.
    pub fn wants_tick(&self) -> bool {
        self.state.running && self.can_advance()
    }

    fn can_advance(&self) -> bool {
        match self.route.last_idx() {
            Some(last) => self.state.cursor < last,
            None => false,
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Where the vehicle is now. None only for an empty route.
    pub fn current(&self) -> Option<&Sample> {
        self.route.get(self.state.cursor)
    }

    /// The speed over the last step. None at the very start, since there's no previous sample.
    pub fn current_speed(&self) -> Option<f64> {
        if self.state.cursor == 0 {
            return None;
        }
        let prev = self.route.get(self.state.cursor - 1)?;
        let current = self.route.get(self.state.cursor)?;
        Some(speed::speed_kmh(prev, current))
    }

    /// Everything from the start up to and including the current sample.
    pub fn traveled(&self) -> &[Sample] {
        let samples = self.route.samples();
        if samples.is_empty() {
            return samples;
        }
        &samples[..=self.state.cursor]
    }

    pub fn destination(&self) -> Option<&Sample> {
        self.route.last()
    }
}
