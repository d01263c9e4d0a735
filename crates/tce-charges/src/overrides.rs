//! Manual override of the non-brokerage charge figure.
//!
//! A trader reconciling against a broker contract note can paste the real
//! statutory total in place of the computed estimate. Once edited, the value
//! is sticky: recomputing the breakdown (new price or quantity) refreshes the
//! computed baseline but leaves the manual figure in force until `reset`.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::ChargeError;
use crate::money::Money;
use crate::types::ChargeBreakdown;

/// Everything in `total_charges` except brokerage (statutory levies, GST, DP).
///
/// Always 0 for `Other`, which has no statutory schedule.
pub fn non_brokerage_charges(bd: &ChargeBreakdown) -> Money {
    bd.total_charges - bd.brokerage
}

/// Computed vs manually entered non-brokerage charges for one breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverrideState {
    computed_value: Money,
    manual_value: Option<Money>,
}

impl OverrideState {
    /// Fresh, unedited state for `bd`.
    pub fn for_breakdown(bd: &ChargeBreakdown) -> Self {
        Self {
            computed_value: non_brokerage_charges(bd),
            manual_value: None,
        }
    }

    /// Start from `bd` and immediately apply a manual value.
    pub fn apply_override(bd: &ChargeBreakdown, manual: Decimal) -> Result<Self, ChargeError> {
        let mut st = Self::for_breakdown(bd);
        st.set_manual(manual)?;
        Ok(st)
    }

    /// Replace the effective figure. Only non-negativity is enforced.
    pub fn set_manual(&mut self, manual: Decimal) -> Result<(), ChargeError> {
        if manual < Decimal::ZERO {
            return Err(ChargeError::NegativeOverride { value: manual });
        }
        let value = Money::checked_round(manual).ok_or(ChargeError::Overflow { what: "override" })?;
        debug!(computed = %self.computed_value, manual = %value, "non-brokerage charges overridden");
        self.manual_value = Some(value);
        Ok(())
    }

    /// Drop the manual value; the computed figure is effective again.
    pub fn reset(self) -> Self {
        if self.manual_value.is_some() {
            debug!(computed = %self.computed_value, "override reset");
        }
        Self {
            computed_value: self.computed_value,
            manual_value: None,
        }
    }

    /// Rebase on a recomputed breakdown. A manual value survives.
    pub fn refresh(self, bd: &ChargeBreakdown) -> Self {
        let computed_value = non_brokerage_charges(bd);
        debug!(
            previous = %self.computed_value,
            computed = %computed_value,
            edited = self.manual_value.is_some(),
            "override baseline refreshed"
        );
        Self {
            computed_value,
            manual_value: self.manual_value,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.manual_value.is_some()
    }

    /// `manual_value` if edited, else `computed_value`.
    pub fn effective(&self) -> Money {
        self.manual_value.unwrap_or(self.computed_value)
    }

    pub fn computed_value(&self) -> Money {
        self.computed_value
    }

    pub fn manual_value(&self) -> Option<Money> {
        self.manual_value
    }
}
