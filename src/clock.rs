use chrono::NaiveDateTime;

/// Source of local wall-clock time.
///
/// Injected into the scheduler so eligibility checks can be driven with
/// fixed instants in tests instead of real elapsed time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// Real local time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
