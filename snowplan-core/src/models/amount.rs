//! Milliunit currency amounts.
//!
//! The budgeting API expresses every balance in milliunits: 1/1000 of the
//! budget's currency unit, so `-12_345_670` is -$12,345.67 in a USD budget.
//! Keeping amounts in an integer newtype avoids float drift in balances and
//! makes it impossible to feed raw milliunits into per-unit math unnoticed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A currency amount in milliunits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub i64);

impl Amount {
    /// Zero milliunits.
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from whole currency units.
    pub fn from_units(units: i64) -> Self {
        Amount(units * 1000)
    }

    /// Creates an amount from a fractional number of currency units.
    ///
    /// Rounds to the nearest milliunit.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_units_f64(units: f64) -> Self {
        Amount((units * 1000.0).round() as i64)
    }

    /// Returns the amount as fractional currency units.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_units(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Raw milliunits.
    pub fn milliunits(self) -> i64 {
        self.0
    }

    /// Returns the magnitude of the amount.
    pub fn abs(self) -> Amount {
        Amount(self.0.abs())
    }

    /// True when the amount is strictly below zero.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_units())
    }
}

// ============================================================================
// Tests
// ============================================================================
