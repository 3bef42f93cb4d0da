//! Product price in minor currency units.

use super::CatalogDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative price stored in minor units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Creates a price from minor units.
    #[must_use]
    pub const fn from_minor_units(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the price in minor units.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.0
    }

    /// Parses a decimal amount such as `1999`, `1999.5` or `1999.50`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidPrice`] for negative values,
    /// more than two decimals, or anything that is not a number.
    pub fn parse(raw: &str) -> Result<Self, CatalogDomainError> {
        let invalid = || CatalogDomainError::InvalidPrice(raw.to_owned());
        let trimmed = raw.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let digits_only = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) || fraction.len() > 2 {
            return Err(invalid());
        }
        let units: u64 = whole.parse().map_err(|_| invalid())?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        units
            .checked_mul(100)
            .and_then(|value| value.checked_add(cents))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (units, cents) = (self.0.div_euclid(100), self.0.rem_euclid(100));
        write!(f, "{units}.{cents:02}")
    }
}
