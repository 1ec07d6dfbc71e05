use chrono::Weekday;
use kaformula_common::tolerance::{self, Tolerance};

/// Per-engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Decimal places for tolerant comparisons. `None` uses the
    /// process-wide default from `tolerance::default_tolerance`.
    pub precision: Option<u32>,
    /// Day `startoftheweek` snaps back to.
    pub first_day_of_week: Weekday,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: None,
            first_day_of_week: Weekday::Mon,
        }
    }
}

impl EngineConfig {
    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_first_day_of_week(mut self, day: Weekday) -> Self {
        self.first_day_of_week = day;
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        tolerance::tolerance_for(self.precision)
    }
}
