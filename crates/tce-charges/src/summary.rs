//! Figures derived from a priced leg: order amount and breakeven.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ChargeError;
use crate::money::Money;
use crate::overrides::OverrideState;
use crate::types::{ChargeBreakdown, Side};

/// `turnover + effective non-brokerage charges + brokerage`.
///
/// This is the amount a caller compares against available capital.
pub fn total_order_amount(bd: &ChargeBreakdown, ov: &OverrideState) -> Result<Money, ChargeError> {
    bd.turnover
        .checked_add(ov.effective())
        .and_then(|m| m.checked_add(bd.brokerage))
        .ok_or(ChargeError::Overflow {
            what: "total order amount",
        })
}

/// `total_charges / quantity`: the favourable move per unit that pays for all
/// charges. Returned unrounded so that `per_unit × quantity` reproduces the
/// charges.
pub fn break_even_per_unit(total_charges: Money, quantity: Decimal) -> Result<Decimal, ChargeError> {
    if quantity.is_zero() {
        return Err(ChargeError::ZeroQuantity);
    }
    if quantity < Decimal::ZERO {
        return Err(ChargeError::invalid("quantity", quantity));
    }
    total_charges
        .value()
        .checked_div(quantity)
        .ok_or(ChargeError::Overflow {
            what: "breakeven per unit",
        })
}

/// Exit price at which a position opened on `entry_side` at `entry_price`
/// nets zero after charges. Long positions must rise, short ones fall.
pub fn break_even_price(
    entry_side: Side,
    entry_price: Decimal,
    total_charges: Money,
    quantity: Decimal,
) -> Result<Decimal, ChargeError> {
    let per_unit = break_even_per_unit(total_charges, quantity)?;
    Ok(match entry_side {
        Side::Buy => entry_price + per_unit,
        Side::Sell => entry_price - per_unit,
    })
}

/// Display-ready summary of one leg plus its override state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub turnover: Money,
    pub brokerage: Money,
    pub effective_non_brokerage: Money,
    pub edited: bool,
    /// `brokerage + effective_non_brokerage`; differs from the breakdown
    /// total only when the override is edited.
    pub total_charges: Money,
    pub total_order_amount: Money,
    pub break_even_per_unit: Decimal,
}

impl OrderSummary {
    pub fn build(bd: &ChargeBreakdown, ov: &OverrideState) -> Result<Self, ChargeError> {
        let effective = ov.effective();
        let total_charges = bd
            .brokerage
            .checked_add(effective)
            .ok_or(ChargeError::Overflow {
                what: "effective charges",
            })?;
        Ok(Self {
            turnover: bd.turnover,
            brokerage: bd.brokerage,
            effective_non_brokerage: effective,
            edited: ov.is_edited(),
            total_charges,
            total_order_amount: total_order_amount(bd, ov)?,
            break_even_per_unit: break_even_per_unit(total_charges, bd.quantity)?,
        })
    }
}
