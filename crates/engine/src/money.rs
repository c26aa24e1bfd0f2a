use std::{fmt, ops::Neg};

use crate::EngineError;

/// Signed money amount represented as **integer minor units** (cents).
///
/// Prices and revenues are stored as `i64` minor units in the database; this
/// type wraps them whenever the engine does arithmetic on money, so no value
/// ever goes through floating point.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let price = Money::new(5_00);
/// assert_eq!(price.minor(), 500);
/// assert_eq!(price.to_string(), "5.00");
/// assert_eq!(price.line_total(3).unwrap().to_string(), "15.00");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Unit price times a number of units.
    pub fn line_total(self, quantity: i64) -> Result<Money, EngineError> {
        self.0
            .checked_mul(quantity)
            .map(Money)
            .ok_or_else(|| EngineError::InvalidAmount(format!("{quantity} x {self} overflows")))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}
