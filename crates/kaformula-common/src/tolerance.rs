//! "Equal enough" comparisons for floating-point results.
//!
//! For `p` decimal places two values are equal when they differ by at most
//! `10^-p - 10^-(p+1) - 10^-(p+2)`. The process-wide default is set at most
//! once, before any engine is used, and is read-only afterwards.

use once_cell::sync::OnceCell;
use thiserror::Error;

pub const DEFAULT_DECIMALS: u32 = 5;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerance {
    decimals: u32,
    band: f64,
}

impl Tolerance {
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals,
            band: band_for(decimals),
        }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn band(&self) -> f64 {
        self.band
    }

    pub fn equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.band
    }

    /// Strictly less, outside the tolerance band.
    pub fn less(&self, a: f64, b: f64) -> bool {
        !self.equal(a, b) && a < b
    }

    /// Strictly greater, outside the tolerance band.
    pub fn greater(&self, a: f64, b: f64) -> bool {
        !self.equal(a, b) && a > b
    }

    pub fn less_or_equal(&self, a: f64, b: f64) -> bool {
        self.equal(a, b) || a < b
    }

    pub fn greater_or_equal(&self, a: f64, b: f64) -> bool {
        self.equal(a, b) || a > b
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMALS)
    }
}

fn band_for(decimals: u32) -> f64 {
    let p = decimals as i32;
    10f64.powi(-p) - 10f64.powi(-(p + 1)) - 10f64.powi(-(p + 2))
}

/// `numer / denom`, or `0.0` when the denominator is exactly zero.
pub fn safe_div(numer: f64, denom: f64) -> f64 {
    if denom == 0.0 { 0.0 } else { numer / denom }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceError {
    #[error("default tolerance already initialised with {0} decimals")]
    AlreadyInitialised(u32),
}

static DEFAULT: OnceCell<Tolerance> = OnceCell::new();

/// Configure the process-wide default precision. Only the first call
/// succeeds; call it once at start-up, before evaluating anything.
pub fn init_default_decimals(decimals: u32) -> Result<(), ToleranceError> {
    DEFAULT
        .set(Tolerance::new(decimals))
        .map_err(|_| ToleranceError::AlreadyInitialised(default_tolerance().decimals()))
}

/// The process-wide default, `DEFAULT_DECIMALS` unless configured.
pub fn default_tolerance() -> Tolerance {
    *DEFAULT.get_or_init(Tolerance::default)
}

/// Tolerance for an optional per-engine precision.
pub fn tolerance_for(decimals: Option<u32>) -> Tolerance {
    decimals.map_or_else(default_tolerance, Tolerance::new)
}
