//! Scenario: side dependent rules
//!
//! Validates:
//! 1) STT is sell-only for derivatives and intraday, both sides for delivery.
//! 2) Stamp duty is buy-only, and positive on buys for every statutory category.
//! 3) DP charge appears only on delivery sells.
//! 4) GST is levied on brokerage + exchange + SEBI and nothing else.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tce_charges::{
    compute_leg, ChargeBreakdown, ChargeInput, InstrumentCategory, Money, RateRegistry,
    RateSchedule, Side,
};

fn leg(reg: &RateRegistry, category: InstrumentCategory, side: Side) -> ChargeBreakdown {
    compute_leg(
        reg,
        &ChargeInput::new(category, side, dec!(1000), dec!(100), Some(dec!(20))),
    )
    .unwrap()
}

#[test]
fn stt_is_sell_only_except_delivery() {
    let reg = RateRegistry::reference();
    for category in [
        InstrumentCategory::IntradayEquity,
        InstrumentCategory::OptionsDerivative,
        InstrumentCategory::FuturesDerivative,
    ] {
        assert_eq!(leg(&reg, category, Side::Buy).stt_charges, Money::ZERO, "{category}");
        assert!(leg(&reg, category, Side::Sell).stt_charges.is_positive(), "{category}");
    }

    let delivery = InstrumentCategory::DeliveryEquity;
    assert!(leg(&reg, delivery, Side::Buy).stt_charges.is_positive());
    assert!(leg(&reg, delivery, Side::Sell).stt_charges.is_positive());
    assert_eq!(
        leg(&reg, delivery, Side::Buy).stt_charges,
        leg(&reg, delivery, Side::Sell).stt_charges
    );
}

#[test]
fn stamp_duty_is_buy_only() {
    let reg = RateRegistry::reference();
    for category in InstrumentCategory::ALL {
        assert_eq!(leg(&reg, category, Side::Sell).stamp_duty, Money::ZERO, "{category}");
        let buy = leg(&reg, category, Side::Buy).stamp_duty;
        if category.is_statutory() {
            assert!(buy.is_positive(), "{category}");
        } else {
            assert_eq!(buy, Money::ZERO);
        }
    }
}

#[test]
fn dp_charge_only_on_delivery_sell() {
    let reg = RateRegistry::reference();
    for category in InstrumentCategory::ALL {
        for side in [Side::Buy, Side::Sell] {
            let dp = leg(&reg, category, side).dp_charges;
            if category == InstrumentCategory::DeliveryEquity && side == Side::Sell {
                assert_eq!(dp.value(), dec!(15.93));
            } else {
                assert_eq!(dp, Money::ZERO, "{category} {side}");
            }
        }
    }
}

#[test]
fn gst_base_is_brokerage_exchange_and_sebi() {
    let reg = RateRegistry::reference();
    for category in InstrumentCategory::STATUTORY {
        for side in [Side::Buy, Side::Sell] {
            let bd = leg(&reg, category, side);
            let base = bd.brokerage + bd.exchange_charges + bd.sebi_charges;
            assert_eq!(bd.gst_charges, base.apply_rate(reg.lookup(category).gst_rate));
        }
    }
}

#[test]
fn changing_stt_or_stamp_duty_never_changes_gst() {
    let reg = RateRegistry::reference();
    let category = InstrumentCategory::DeliveryEquity;
    let base = reg.lookup(category);
    let heavier = RateSchedule {
        stamp_duty_rate: base.stamp_duty_rate * Decimal::TEN,
        stt: tce_charges::SideRates::both(dec!(0.005)),
        ..base
    };
    let reg2 = reg.with_schedule(category, heavier).unwrap();

    for side in [Side::Buy, Side::Sell] {
        let a = leg(&reg, category, side);
        let b = leg(&reg2, category, side);
        assert_ne!(a.stt_charges, b.stt_charges);
        assert_eq!(a.gst_charges, b.gst_charges);
    }
}
