//! Scenario: charge decomposition
//!
//! Validates:
//! 1) total_charges equals the sum of its rounded components exactly.
//! 2) turnover == round2(price × quantity).
//! 3) The intraday sell reference trade reproduces its published breakdown.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tce_charges::{
    compute_leg, round2, ChargeInput, InstrumentCategory, Money, RateRegistry, Side,
};

const PRICES: [Decimal; 5] = [dec!(0.05), dec!(12.345), dec!(95), dec!(1234.56), dec!(48215.7)];
const QUANTITIES: [Decimal; 4] = [dec!(1), dec!(3), dec!(75), dec!(1250)];
const BROKERAGES: [Decimal; 3] = [dec!(0), dec!(0.015), dec!(20)];

#[test]
fn total_is_exact_sum_of_components_for_every_category_and_side() {
    let reg = RateRegistry::reference();
    for category in InstrumentCategory::ALL {
        for side in [Side::Buy, Side::Sell] {
            for price in PRICES {
                for qty in QUANTITIES {
                    for brokerage in BROKERAGES {
                        let bd = compute_leg(
                            &reg,
                            &ChargeInput::new(category, side, price, qty, Some(brokerage)),
                        )
                        .unwrap();

                        let sum = bd.brokerage.value()
                            + bd.stt_charges.value()
                            + bd.exchange_charges.value()
                            + bd.sebi_charges.value()
                            + bd.stamp_duty.value()
                            + bd.gst_charges.value()
                            + bd.dp_charges.value();
                        assert_eq!(bd.total_charges.value(), sum, "{category} {side} {price}x{qty}");
                        assert_eq!(bd.total_charges, bd.component_sum().unwrap());
                        assert_eq!(bd.total_charges.value().scale(), 2);
                    }
                }
            }
        }
    }
}

#[test]
fn turnover_is_rounded_price_times_quantity() {
    let reg = RateRegistry::reference();
    for price in PRICES {
        for qty in QUANTITIES {
            let bd = compute_leg(
                &reg,
                &ChargeInput::new(InstrumentCategory::DeliveryEquity, Side::Buy, price, qty, None),
            )
            .unwrap();
            assert_eq!(bd.turnover.value(), round2(price * qty));
        }
    }
}

#[test]
fn intraday_sell_reference_trade() {
    let bd = compute_leg(
        &RateRegistry::reference(),
        &ChargeInput::new(
            InstrumentCategory::IntradayEquity,
            Side::Sell,
            dec!(100),
            dec!(10),
            Some(dec!(20)),
        ),
    )
    .unwrap();

    assert_eq!(bd.turnover.value(), dec!(1000.00));
    assert_eq!(bd.brokerage.value(), dec!(20.00));
    assert_eq!(bd.stt_charges.value(), dec!(0.25));
    assert_eq!(bd.exchange_charges.value(), dec!(0.03));
    assert_eq!(bd.sebi_charges, Money::ZERO);
    assert_eq!(bd.stamp_duty, Money::ZERO);
    assert_eq!(bd.gst_charges.value(), dec!(3.61));
    assert_eq!(bd.dp_charges, Money::ZERO);
    assert_eq!(bd.total_charges.value(), dec!(23.89));
    assert_eq!(bd.total_charges.to_string(), "23.89");
}
