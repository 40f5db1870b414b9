//! Positive item quantity with lenient input coercion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Number of items requested; always at least one.
///
/// Free-form input never fails: anything non-numeric or not positive
/// becomes one, and counts beyond `u32::MAX` saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single item.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Creates a quantity from a positive count.
    #[must_use]
    pub const fn new(count: NonZeroU32) -> Self {
        Self(count)
    }

    /// Coerces a signed count.
    #[must_use]
    pub fn from_count(count: i64) -> Self {
        if count <= 0 {
            return Self::ONE;
        }
        let clamped = u32::try_from(count).unwrap_or(u32::MAX);
        NonZeroU32::new(clamped).map_or(Self::ONE, Self)
    }

    /// Coerces free-form user input.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map_or(Self::ONE, Self::from_count)
    }

    /// Returns the count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<i64> for Quantity {
    fn from(count: i64) -> Self {
        Self::from_count(count)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
