//! Round-trip calculator: an entry and an exit leg priced together.
//!
//! One brokerage figure covers the whole round trip and is split evenly
//! across the two legs (each half rounded to 2 dp on its own, so the legs
//! together may differ from the supplied total by at most 0.01 per leg).
//!
//! When the legs carry different quantities (independent buy/sell fills),
//! turnover and charges are summed over each leg's own quantity while
//! profit/loss is measured on the matched quantity `min(buy, sell)`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ChargeError;
use crate::leg::compute_leg;
use crate::money::Money;
use crate::registry::RateRegistry;
use crate::types::{ChargeInput, CombinedResult, InstrumentCategory, Side};

/// Price and quantity of one side of a round trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegFill {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl LegFill {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTripRequest {
    pub category: InstrumentCategory,
    pub buy: LegFill,
    pub sell: LegFill,
    /// One brokerage for the pair; `None` means 0.
    #[serde(default)]
    pub total_brokerage: Option<Decimal>,
}

impl RoundTripRequest {
    /// Both legs at the same quantity (the complete-trade dialog).
    pub fn matched(
        category: InstrumentCategory,
        quantity: Decimal,
        buy_price: Decimal,
        sell_price: Decimal,
        total_brokerage: Option<Decimal>,
    ) -> Self {
        Self {
            category,
            buy: LegFill::new(buy_price, quantity),
            sell: LegFill::new(sell_price, quantity),
            total_brokerage,
        }
    }

    /// Independent buy and sell fills (the calculator page).
    pub fn split(
        category: InstrumentCategory,
        buy: LegFill,
        sell: LegFill,
        total_brokerage: Option<Decimal>,
    ) -> Self {
        Self {
            category,
            buy,
            sell,
            total_brokerage,
        }
    }
}

/// Price both legs and derive combined turnover, charges and profit/loss.
pub fn compute_round_trip(
    registry: &RateRegistry,
    req: &RoundTripRequest,
) -> Result<CombinedResult, ChargeError> {
    let total_brokerage = req.total_brokerage.unwrap_or(Decimal::ZERO);
    if total_brokerage < Decimal::ZERO {
        return Err(ChargeError::invalid("brokerage", total_brokerage));
    }
    // Each leg rounds its half on its own.
    let per_leg = total_brokerage / Decimal::TWO;

    let buy_leg = compute_leg(
        registry,
        &ChargeInput::new(
            req.category,
            Side::Buy,
            req.buy.price,
            req.buy.quantity,
            Some(per_leg),
        ),
    )?;
    let sell_leg = compute_leg(
        registry,
        &ChargeInput::new(
            req.category,
            Side::Sell,
            req.sell.price,
            req.sell.quantity,
            Some(per_leg),
        ),
    )?;

    let matched_quantity = req.buy.quantity.min(req.sell.quantity);
    let gross = (req.sell.price - req.buy.price)
        .checked_mul(matched_quantity)
        .ok_or(ChargeError::Overflow {
            what: "gross profit/loss",
        })?;
    let gross_profit_loss = Money::checked_round(gross).ok_or(ChargeError::Overflow {
        what: "gross profit/loss",
    })?;

    let turnover = buy_leg
        .turnover
        .checked_add(sell_leg.turnover)
        .ok_or(ChargeError::Overflow {
            what: "round-trip turnover",
        })?;
    let total_charges = buy_leg
        .total_charges
        .checked_add(sell_leg.total_charges)
        .ok_or(ChargeError::Overflow {
            what: "round-trip charges",
        })?;
    let net_profit_loss = gross_profit_loss
        .checked_sub(total_charges)
        .ok_or(ChargeError::Overflow {
            what: "net profit/loss",
        })?;

    trace!(
        category = %req.category,
        %matched_quantity,
        %gross_profit_loss,
        %net_profit_loss,
        "round trip computed"
    );

    Ok(CombinedResult {
        buy_leg,
        sell_leg,
        matched_quantity,
        turnover,
        total_charges,
        gross_profit_loss,
        net_profit_loss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn brokerage_is_split_evenly() {
        let r = compute_round_trip(
            &RateRegistry::reference(),
            &RoundTripRequest::matched(
                InstrumentCategory::FuturesDerivative,
                dec!(50),
                dec!(200),
                dec!(198),
                Some(dec!(40)),
            ),
        )
        .unwrap();
        assert_eq!(r.buy_leg.brokerage.value(), dec!(20.00));
        assert_eq!(r.sell_leg.brokerage.value(), dec!(20.00));
        assert_eq!(r.gross_profit_loss.value(), dec!(-100.00));
        assert!(r.net_profit_loss < r.gross_profit_loss);
    }

    #[test]
    fn legs_are_fixed_buy_then_sell() {
        let r = compute_round_trip(
            &RateRegistry::reference(),
            &RoundTripRequest::matched(
                InstrumentCategory::IntradayEquity,
                dec!(1),
                dec!(10),
                dec!(11),
                None,
            ),
        )
        .unwrap();
        assert_eq!(r.buy_leg.side, Side::Buy);
        assert_eq!(r.sell_leg.side, Side::Sell);
        assert_eq!(r.buy_leg.brokerage, Money::ZERO);
    }

    #[test]
    fn negative_total_brokerage_is_rejected() {
        let err = compute_round_trip(
            &RateRegistry::reference(),
            &RoundTripRequest::matched(
                InstrumentCategory::IntradayEquity,
                dec!(1),
                dec!(10),
                dec!(11),
                Some(dec!(-1)),
            ),
        )
        .unwrap_err();
        assert!(matches!(err, ChargeError::InvalidChargeInput { field: "brokerage", .. }));
    }

    #[test]
    fn overflowing_combined_turnover_is_reported() {
        // Each leg's turnover fits at 2 dp; their sum does not.
        let price = dec!(500000000000000000000000000);
        let err = compute_round_trip(
            &RateRegistry::reference(),
            &RoundTripRequest::matched(InstrumentCategory::Other, dec!(1), price, price, None),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ChargeError::Overflow {
                what: "round-trip turnover"
            }
        );
    }

    #[test]
    fn huge_prices_fail_without_panicking() {
        let price = Decimal::MAX / Decimal::TWO + dec!(1000);
        let err = compute_round_trip(
            &RateRegistry::reference(),
            &RoundTripRequest::matched(InstrumentCategory::Other, dec!(1), price, price, None),
        )
        .unwrap_err();
        assert!(matches!(err, ChargeError::Overflow { .. }));
    }

    #[test]
    fn invalid_sell_leg_fails_the_whole_round_trip() {
        let err = compute_round_trip(
            &RateRegistry::reference(),
            &RoundTripRequest::split(
                InstrumentCategory::DeliveryEquity,
                LegFill::new(dec!(100), dec!(5)),
                LegFill::new(dec!(0), dec!(5)),
                None,
            ),
        )
        .unwrap_err();
        assert!(matches!(err, ChargeError::InvalidChargeInput { field: "price", .. }));
    }
}
