use std::time::{Duration, Instant};

/// Identifies one scheduled tick. Once cancelled or fired, a handle is stale forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle {
    pub due: Instant,
    generation: usize,
}

/// Owns at most one outstanding tick. Scheduling a new one cancels the old.
pub struct TickTimer {
    interval: Duration,
    pending: Option<TickHandle>,
    generation: usize,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            generation: 0,
        }
    }

    /// Returns None, leaving nothing scheduled, if the deadline can't be represented.
    pub fn schedule(&mut self, now: Instant) -> Option<TickHandle> {
        self.cancel();
        let due = match now.checked_add(self.interval) {
            Some(due) => due,
            None => {
                warn!("Can't schedule a tick {:?} from now", self.interval);
                return None;
            }
        };
        self.generation += 1;
        let handle = TickHandle {
            due,
            generation: self.generation,
        };
        debug!(
            "Scheduled tick #{} in {:?}",
            handle.generation, self.interval
        );
        self.pending = Some(handle);
        Some(handle)
    }

    /// Returns true if there was something to cancel.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                debug!("Cancelled tick #{}", handle.generation);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|handle| handle.due)
    }

    /// If the pending tick is due, consumes and returns it.
    pub fn fire(&mut self, now: Instant) -> Option<TickHandle> {
        match self.pending {
            Some(handle) if now >= handle.due => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }
}
