//! Time source behind `_now_`, `_today_`, `now(n)`, `today(n)` and
//! time-only `stringtodatetime` input.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

pub trait ClockProvider: Debug + Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local time from the operating system.
#[cfg(feature = "system-clock")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(feature = "system-clock")]
impl ClockProvider for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock frozen at one instant, for deterministic hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl ClockProvider for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// `SystemClock` when available, otherwise a clock frozen at the serial epoch.
pub fn default_clock() -> Arc<dyn ClockProvider> {
    #[cfg(feature = "system-clock")]
    {
        Arc::new(SystemClock)
    }
    #[cfg(not(feature = "system-clock"))]
    {
        use chrono::NaiveTime;
        Arc::new(FixedClock(kaformula_common::OA_EPOCH.and_time(NaiveTime::MIN)))
    }
}
