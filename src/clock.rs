use chrono::{DateTime, Local};

/// Source of wall-clock readings for the timer.
///
/// Transitions sample the clock exactly once, so swapping in a fixed clock
/// makes every time computation deterministic under test.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
