//! Rate schedule registry.
//!
//! One immutable [`RateSchedule`] per statutory [`InstrumentCategory`].
//! `Other` always resolves to the all-zero schedule: there is nothing to
//! compute, every non-brokerage figure must be entered manually.
//!
//! The registry is an explicit value handed to the calculators. Rate changes
//! (a new budget, a different exchange) are config changes:
//!
//! ```yaml
//! rates:
//!   intraday_equity:
//!     stt: { buy: 0, sell: 0.00025 }
//!     exchange: 0.0000345
//!     sebi: 0.0000001
//!     stamp_duty: 0.00003
//!     gst: 0.18
//!   delivery_equity:
//!     ...
//!     dp_flat_fee: 15.93
//! ```

use anyhow::{anyhow, bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use tce_config::decimal_at;

use crate::types::{InstrumentCategory, Side};

/// A rate that may differ per side (zero marks the side where it does not apply).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SideRates {
    pub buy: Decimal,
    pub sell: Decimal,
}

impl SideRates {
    pub const ZERO: SideRates = SideRates {
        buy: Decimal::ZERO,
        sell: Decimal::ZERO,
    };

    pub fn sell_only(sell: Decimal) -> Self {
        Self {
            buy: Decimal::ZERO,
            sell,
        }
    }

    pub fn both(rate: Decimal) -> Self {
        Self {
            buy: rate,
            sell: rate,
        }
    }

    pub fn for_side(&self, side: Side) -> Decimal {
        match side {
            Side::Buy => self.buy,
            Side::Sell => self.sell,
        }
    }
}

/// Charge rates for one instrument category. All rates are fractions of
/// turnover (0.18 = 18%) except `dp_flat_fee`, which is an absolute amount.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RateSchedule {
    /// Securities Transaction Tax, per side.
    pub stt: SideRates,
    pub exchange_rate: Decimal,
    pub sebi_rate: Decimal,
    /// Applied on the buy side only.
    pub stamp_duty_rate: Decimal,
    /// Applied to brokerage + exchange + SEBI.
    pub gst_rate: Decimal,
    /// Depository charge per sell of a delivery holding.
    pub dp_flat_fee: Decimal,
}

impl RateSchedule {
    pub const ZERO: RateSchedule = RateSchedule {
        stt: SideRates::ZERO,
        exchange_rate: Decimal::ZERO,
        sebi_rate: Decimal::ZERO,
        stamp_duty_rate: Decimal::ZERO,
        gst_rate: Decimal::ZERO,
        dp_flat_fee: Decimal::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        *self == RateSchedule::ZERO
    }

    fn validate(&self, category: InstrumentCategory) -> Result<()> {
        let fractions = [
            ("stt.buy", self.stt.buy),
            ("stt.sell", self.stt.sell),
            ("exchange", self.exchange_rate),
            ("sebi", self.sebi_rate),
            ("stamp_duty", self.stamp_duty_rate),
            ("gst", self.gst_rate),
        ];
        for (name, rate) in fractions {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                bail!(
                    "rates.{}.{} must be in [0, 1) as a fraction of turnover (got {})",
                    category,
                    name,
                    rate
                );
            }
        }
        if self.dp_flat_fee < Decimal::ZERO {
            bail!(
                "rates.{}.dp_flat_fee must be >= 0 (got {})",
                category,
                self.dp_flat_fee
            );
        }
        if !self.dp_flat_fee.is_zero() && category != InstrumentCategory::DeliveryEquity {
            bail!(
                "rates.{}.dp_flat_fee is only charged on delivery_equity sells (got {})",
                category,
                self.dp_flat_fee
            );
        }
        Ok(())
    }
}

/// Rate schedules keyed by category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RateRegistry {
    schedules: BTreeMap<InstrumentCategory, RateSchedule>,
}

impl RateRegistry {
    /// Build from explicit schedules. `Other` and missing categories fall back
    /// to the zero schedule; an `Other` entry that is not all-zero is refused.
    pub fn new<I>(schedules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (InstrumentCategory, RateSchedule)>,
    {
        let mut map = BTreeMap::new();
        for (category, schedule) in schedules {
            if !category.is_statutory() {
                if !schedule.is_zero() {
                    bail!("category 'other' has no statutory schedule; enter its charges as an override");
                }
                continue;
            }
            schedule.validate(category)?;
            map.insert(category, schedule);
        }
        Ok(Self { schedules: map })
    }

    /// Illustrative rate set (NSE-style). Replace with verified, current
    /// figures through config before relying on the numbers.
    pub fn reference() -> Self {
        let schedules = [
            (
                InstrumentCategory::OptionsDerivative,
                RateSchedule {
                    stt: SideRates::sell_only(dec!(0.001)),
                    exchange_rate: dec!(0.0003503),
                    sebi_rate: dec!(0.0000001),
                    stamp_duty_rate: dec!(0.00003),
                    gst_rate: dec!(0.18),
                    dp_flat_fee: Decimal::ZERO,
                },
            ),
            (
                InstrumentCategory::FuturesDerivative,
                RateSchedule {
                    stt: SideRates::sell_only(dec!(0.0002)),
                    exchange_rate: dec!(0.0000173),
                    sebi_rate: dec!(0.0000001),
                    stamp_duty_rate: dec!(0.00002),
                    gst_rate: dec!(0.18),
                    dp_flat_fee: Decimal::ZERO,
                },
            ),
            (
                InstrumentCategory::IntradayEquity,
                RateSchedule {
                    stt: SideRates::sell_only(dec!(0.00025)),
                    exchange_rate: dec!(0.0000345),
                    sebi_rate: dec!(0.0000001),
                    stamp_duty_rate: dec!(0.00003),
                    gst_rate: dec!(0.18),
                    dp_flat_fee: Decimal::ZERO,
                },
            ),
            (
                InstrumentCategory::DeliveryEquity,
                RateSchedule {
                    stt: SideRates::both(dec!(0.001)),
                    exchange_rate: dec!(0.0000345),
                    sebi_rate: dec!(0.0000001),
                    stamp_duty_rate: dec!(0.00015),
                    gst_rate: dec!(0.18),
                    dp_flat_fee: dec!(15.93),
                },
            ),
        ];
        Self {
            schedules: schedules.into_iter().collect(),
        }
    }

    /// Total lookup: every category resolves, `Other` to the zero schedule.
    pub fn lookup(&self, category: InstrumentCategory) -> RateSchedule {
        self.schedules
            .get(&category)
            .copied()
            .unwrap_or(RateSchedule::ZERO)
    }

    /// Replace one category's schedule, returning the new registry.
    pub fn with_schedule(&self, category: InstrumentCategory, schedule: RateSchedule) -> Result<Self> {
        let mut entries: Vec<(InstrumentCategory, RateSchedule)> =
            self.schedules.iter().map(|(c, s)| (*c, *s)).collect();
        entries.retain(|(c, _)| *c != category);
        entries.push((category, schedule));
        Self::new(entries)
    }

    /// Build from canonical config JSON (produced by tce-config).
    ///
    /// - `/rates` absent: the reference registry.
    /// - `/rates` present: each statutory category must be fully specified:
    ///   stt.buy, stt.sell, exchange, sebi, stamp_duty, gst; dp_flat_fee is
    ///   optional (default 0). Rates accept a number or a numeric string.
    /// - `/rates/other` is refused.
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let rates = match cfg.pointer("/rates") {
            None | Some(Value::Null) => return Ok(Self::reference()),
            Some(Value::Object(map)) => map,
            Some(other) => bail!("config rates must be a mapping (got {other})"),
        };

        if rates.contains_key(InstrumentCategory::Other.as_str()) {
            bail!("config rates.other is not allowed: category 'other' has no statutory schedule");
        }

        let mut entries = Vec::new();
        for category in InstrumentCategory::STATUTORY {
            let base = format!("/rates/{}", category.as_str());
            let required = |leaf: &str| -> Result<Decimal> {
                let ptr = format!("{base}/{leaf}");
                decimal_at(cfg, &ptr)?
                    .ok_or_else(|| anyhow!("config missing {}", ptr.trim_start_matches('/').replace('/', ".")))
            };

            let schedule = RateSchedule {
                stt: SideRates {
                    buy: required("stt/buy")?,
                    sell: required("stt/sell")?,
                },
                exchange_rate: required("exchange")?,
                sebi_rate: required("sebi")?,
                stamp_duty_rate: required("stamp_duty")?,
                gst_rate: required("gst")?,
                dp_flat_fee: decimal_at(cfg, &format!("{base}/dp_flat_fee"))?.unwrap_or_default(),
            };
            entries.push((category, schedule));
        }

        Self::new(entries).context("invalid rate schedule in config")
    }
}
