//! Single-leg charge calculator.
//!
//! Every component is rounded to 2 dp on its own (via [`Money`]) before it
//! enters any later step or the total, so the breakdown reproduces
//! bit-for-bit regardless of summation order.

use rust_decimal::Decimal;
use tracing::trace;

use crate::error::ChargeError;
use crate::money::Money;
use crate::registry::RateRegistry;
use crate::types::{ChargeBreakdown, ChargeInput, InstrumentCategory, Side};

/// Reject non-positive price/quantity and negative brokerage. Never coerces.
pub fn validate_input(input: &ChargeInput) -> Result<(), ChargeError> {
    if input.price <= Decimal::ZERO {
        return Err(ChargeError::invalid("price", input.price));
    }
    if input.quantity <= Decimal::ZERO {
        return Err(ChargeError::invalid("quantity", input.quantity));
    }
    if let Some(b) = input.brokerage {
        if b < Decimal::ZERO {
            return Err(ChargeError::invalid("brokerage", b));
        }
    }
    Ok(())
}

/// Turnover of one leg: `round2(price × quantity)`.
pub fn turnover(price: Decimal, quantity: Decimal) -> Result<Money, ChargeError> {
    price
        .checked_mul(quantity)
        .and_then(Money::checked_round)
        .ok_or(ChargeError::Overflow { what: "turnover" })
}

/// Compute the full charge breakdown for one leg.
pub fn compute_leg(registry: &RateRegistry, input: &ChargeInput) -> Result<ChargeBreakdown, ChargeError> {
    validate_input(input)?;

    let turnover = turnover(input.price, input.quantity)?;
    let brokerage = Money::checked_round(input.brokerage.unwrap_or(Decimal::ZERO))
        .ok_or(ChargeError::Overflow { what: "brokerage" })?;

    let mut bd = ChargeBreakdown {
        category: input.category,
        side: input.side,
        quantity: input.quantity,
        turnover,
        brokerage,
        stt_charges: Money::ZERO,
        exchange_charges: Money::ZERO,
        sebi_charges: Money::ZERO,
        stamp_duty: Money::ZERO,
        gst_charges: Money::ZERO,
        dp_charges: Money::ZERO,
        total_charges: Money::ZERO,
    };

    // `Other` has nothing to compute; its non-brokerage charges arrive as an override.
    if input.category.is_statutory() {
        let schedule = registry.lookup(input.category);

        bd.stt_charges = turnover.apply_rate(schedule.stt.for_side(input.side));
        bd.exchange_charges = turnover.apply_rate(schedule.exchange_rate);
        bd.sebi_charges = turnover.apply_rate(schedule.sebi_rate);
        bd.stamp_duty = match input.side {
            Side::Buy => turnover.apply_rate(schedule.stamp_duty_rate),
            Side::Sell => Money::ZERO,
        };
        // GST is levied on service charges only: never on STT or stamp duty.
        let gst_base = brokerage
            .checked_add(bd.exchange_charges)
            .and_then(|b| b.checked_add(bd.sebi_charges))
            .ok_or(ChargeError::Overflow { what: "GST base" })?;
        bd.gst_charges = gst_base.apply_rate(schedule.gst_rate);
        bd.dp_charges = match (input.category, input.side) {
            (InstrumentCategory::DeliveryEquity, Side::Sell) => Money::round(schedule.dp_flat_fee),
            _ => Money::ZERO,
        };
    }

    bd.total_charges = bd.component_sum()?;

    trace!(
        category = %bd.category,
        side = %bd.side,
        turnover = %bd.turnover,
        total_charges = %bd.total_charges,
        "leg computed"
    );

    Ok(bd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn leg(category: InstrumentCategory, side: Side, price: Decimal, qty: Decimal, brokerage: Decimal) -> ChargeBreakdown {
        compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(category, side, price, qty, Some(brokerage)),
        )
        .unwrap()
    }

    #[test]
    fn zero_price_is_rejected_not_coerced() {
        let err = compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(InstrumentCategory::IntradayEquity, Side::Buy, dec!(0), dec!(10), None),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ChargeError::InvalidChargeInput {
                field: "price",
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(InstrumentCategory::DeliveryEquity, Side::Sell, dec!(10), dec!(-1), None),
        )
        .unwrap_err();
        assert!(matches!(err, ChargeError::InvalidChargeInput { field: "quantity", .. }));
    }

    #[test]
    fn negative_brokerage_is_rejected() {
        let err = compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(InstrumentCategory::DeliveryEquity, Side::Sell, dec!(10), dec!(1), Some(dec!(-20))),
        )
        .unwrap_err();
        assert!(err.to_string().contains("brokerage must be >= 0"));
    }

    #[test]
    fn missing_brokerage_is_zero() {
        let bd = compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(InstrumentCategory::IntradayEquity, Side::Buy, dec!(100), dec!(10), None),
        )
        .unwrap();
        assert_eq!(bd.brokerage, Money::ZERO);
    }

    #[test]
    fn other_carries_brokerage_only() {
        let bd = leg(InstrumentCategory::Other, Side::Sell, dec!(250), dec!(4), dec!(20));
        assert_eq!(bd.turnover.value(), dec!(1000.00));
        assert_eq!(bd.total_charges, bd.brokerage);
        assert_eq!(bd.gst_charges, Money::ZERO);
    }

    #[test]
    fn turnover_rounds_fractional_quantity() {
        let bd = leg(InstrumentCategory::FuturesDerivative, Side::Buy, dec!(101.333), dec!(3), dec!(0));
        assert_eq!(bd.turnover.value(), dec!(304.00));
    }

    #[test]
    fn overflowing_turnover_is_reported() {
        let err = compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(InstrumentCategory::IntradayEquity, Side::Buy, Decimal::MAX, dec!(2), None),
        )
        .unwrap_err();
        assert_eq!(err, ChargeError::Overflow { what: "turnover" });
    }

    #[test]
    fn unrepresentable_brokerage_is_reported() {
        let err = compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(
                InstrumentCategory::IntradayEquity,
                Side::Sell,
                dec!(1000000),
                dec!(1000000),
                Some(Decimal::MAX - Decimal::ONE),
            ),
        )
        .unwrap_err();
        assert_eq!(err, ChargeError::Overflow { what: "brokerage" });
    }

    #[test]
    fn overflowing_charge_total_is_reported() {
        // Each component fits at 2 dp; brokerage + GST does not.
        let err = compute_leg(
            &RateRegistry::reference(),
            &ChargeInput::new(
                InstrumentCategory::IntradayEquity,
                Side::Sell,
                dec!(10000000000000),
                dec!(10000000000000),
                Some(dec!(700000000000000000000000000)),
            ),
        )
        .unwrap_err();
        assert_eq!(err, ChargeError::Overflow { what: "total charges" });
    }

    #[test]
    fn delivery_sell_pays_dp_and_buy_does_not() {
        let sell = leg(InstrumentCategory::DeliveryEquity, Side::Sell, dec!(500), dec!(10), dec!(0));
        let buy = leg(InstrumentCategory::DeliveryEquity, Side::Buy, dec!(500), dec!(10), dec!(0));
        assert_eq!(sell.dp_charges.value(), dec!(15.93));
        assert_eq!(buy.dp_charges, Money::ZERO);
    }
}
