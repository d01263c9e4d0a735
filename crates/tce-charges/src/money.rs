//! Two-decimal money type
//!
//! # Motivation
//!
//! Every monetary figure the engine emits (turnover, each charge component,
//! totals, profit/loss) is displayed and summed at 2 decimal places. If
//! rounding happens at the call sites, two screens that add the same
//! components in a different order can disagree by a paisa.
//!
//! `Money` wraps a `Decimal` that is always rounded to exactly two places:
//! - Constructors from a raw `Decimal` are [`Money::round`] and
//!   [`Money::checked_round`].
//! - The sum of 2-dp values is itself 2-dp, so totals never drift.
//!
//! Rates and per-unit prices are NOT money; they stay raw `Decimal`.
//!
//! # Range
//!
//! A 2-dp value fits only when its integer part has at most 26 digits.
//! Engine paths use the `checked_*` forms, which return `None` when a result
//! would lose its 2-dp scale or overflow. The `Add`/`Sub` operators panic on
//! overflow exactly like `Decimal`'s.
//!
//! # Rounding
//!
//! Midpoints round away from zero (`0.125 -> 0.13`, `-0.125 -> -0.13`), which
//! is what a fixed-2-decimal display of the same figure shows.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Number of decimal places every monetary figure carries.
pub const MONEY_DP: u32 = 2;

/// Round to 2 decimal places, midpoint away from zero, with the scale fixed at 2.
///
/// Values too large to carry 2 dp keep a smaller scale; see
/// [`Money::checked_round`].
pub fn round2(value: Decimal) -> Decimal {
    let mut d = value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(MONEY_DP);
    d
}

/// A monetary amount rounded to exactly 2 decimal places.
///
/// Serializes as the decimal string (`"23.89"`), so JSON consumers never see a
/// binary float.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Round `value` to 2 dp.
    #[inline]
    pub fn round(value: Decimal) -> Self {
        Money(round2(value))
    }

    /// Round `value` to 2 dp, or `None` when it is too large to keep 2 dp.
    pub fn checked_round(value: Decimal) -> Option<Self> {
        let d = round2(value);
        (d.scale() == MONEY_DP).then_some(Money(d))
    }

    /// The underlying (already rounded) decimal.
    #[inline]
    pub const fn value(self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).and_then(Money::checked_round)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).and_then(Money::checked_round)
    }

    /// Multiply by a rate and round the product (`round2(self × rate)`).
    #[inline]
    pub fn apply_rate(self, rate: Decimal) -> Money {
        Money::round(self.0 * rate)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Decimal {
        m.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = String;

    /// Deserialization path: refuses values with more than 2 dp instead of
    /// silently rounding data that was supposed to be money already.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        match Money::checked_round(value) {
            Some(m) if m.0 == value => Ok(m),
            Some(_) => Err(format!("money must have at most {MONEY_DP} decimal places, got {value}")),
            None => Err(format!("money out of range: {value}")),
        }
    }
}

impl Add for Money {
    type Output = Money;
    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
