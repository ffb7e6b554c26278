use std::time::Duration;

/// One-shot countdown gate used for cooldowns.
///
/// A timer does nothing until [`Timer::activate`] is called. Callers poll
/// [`Timer::update`] with the session clock every tick; once the duration has
/// elapsed the timer deactivates itself. There are no callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    duration: Duration,
    active: bool,
    started_at: Duration,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: false,
            started_at: Duration::ZERO,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Arm the timer at the given clock reading.
    pub fn activate(&mut self, now: Duration) {
        self.active = true;
        self.started_at = now;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.started_at = Duration::ZERO;
    }

    /// Poll the timer, deactivating it once the duration has elapsed.
    pub fn update(&mut self, now: Duration) {
        if self.active && now.saturating_sub(self.started_at) >= self.duration {
            self.deactivate();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
