use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ChargeError;
use crate::money::Money;

/// What is being traded. Decides which rate schedule applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentCategory {
    OptionsDerivative,
    FuturesDerivative,
    IntradayEquity,
    DeliveryEquity,
    /// No statutory schedule; non-brokerage charges come from a manual override.
    Other,
}

impl InstrumentCategory {
    pub const ALL: [InstrumentCategory; 5] = [
        InstrumentCategory::OptionsDerivative,
        InstrumentCategory::FuturesDerivative,
        InstrumentCategory::IntradayEquity,
        InstrumentCategory::DeliveryEquity,
        InstrumentCategory::Other,
    ];

    /// Categories that carry a statutory rate schedule (everything but `Other`).
    pub const STATUTORY: [InstrumentCategory; 4] = [
        InstrumentCategory::OptionsDerivative,
        InstrumentCategory::FuturesDerivative,
        InstrumentCategory::IntradayEquity,
        InstrumentCategory::DeliveryEquity,
    ];

    /// Canonical snake_case name (also the config key under `/rates`).
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentCategory::OptionsDerivative => "options_derivative",
            InstrumentCategory::FuturesDerivative => "futures_derivative",
            InstrumentCategory::IntradayEquity => "intraday_equity",
            InstrumentCategory::DeliveryEquity => "delivery_equity",
            InstrumentCategory::Other => "other",
        }
    }

    pub fn is_statutory(&self) -> bool {
        !matches!(self, InstrumentCategory::Other)
    }
}

impl std::fmt::Display for InstrumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentCategory {
    type Err = ChargeError;

    /// Accepts the canonical names plus the short forms the trade dialogs use
    /// (`options`, `futures`, `intraday`, `delivery`), case-insensitive, with
    /// `-` or spaces in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        match norm.as_str() {
            "options_derivative" | "options" | "option" => Ok(InstrumentCategory::OptionsDerivative),
            "futures_derivative" | "futures" | "future" => Ok(InstrumentCategory::FuturesDerivative),
            "intraday_equity" | "intraday" | "equity_intraday" => Ok(InstrumentCategory::IntradayEquity),
            "delivery_equity" | "delivery" | "equity_delivery" => Ok(InstrumentCategory::DeliveryEquity),
            "other" => Ok(InstrumentCategory::Other),
            _ => Err(ChargeError::UnknownInstrumentCategory { raw: s.to_string() }),
        }
    }
}

/// BUY or SELL for a single leg.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ChargeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "b" | "long" => Ok(Side::Buy),
            "sell" | "s" | "short" => Ok(Side::Sell),
            _ => Err(ChargeError::UnknownSide { raw: s.to_string() }),
        }
    }
}

/// One transaction to price.
///
/// price and quantity must be > 0 (checked by the calculator, never coerced).
/// brokerage is an absolute amount for this leg; `None` means 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeInput {
    pub category: InstrumentCategory,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    #[serde(default)]
    pub brokerage: Option<Decimal>,
}

impl ChargeInput {
    pub fn new(
        category: InstrumentCategory,
        side: Side,
        price: Decimal,
        quantity: Decimal,
        brokerage: Option<Decimal>,
    ) -> Self {
        Self {
            category,
            side,
            price,
            quantity,
            brokerage,
        }
    }

    /// Bridge from loosely-typed numeric inputs (form fields, JSON floats).
    ///
    /// NaN or infinite price/quantity are rejected as `InvalidChargeInput`.
    /// A NaN, infinite or absent brokerage becomes 0.
    pub fn from_f64(
        category: InstrumentCategory,
        side: Side,
        price: f64,
        quantity: f64,
        brokerage: Option<f64>,
    ) -> Result<Self, ChargeError> {
        let price = Decimal::from_f64(price).ok_or_else(|| ChargeError::invalid("price", price))?;
        let quantity =
            Decimal::from_f64(quantity).ok_or_else(|| ChargeError::invalid("quantity", quantity))?;
        let brokerage = brokerage
            .filter(|b| b.is_finite())
            .and_then(Decimal::from_f64);
        Ok(Self::new(category, side, price, quantity, brokerage))
    }
}

/// Full charge decomposition for one leg. Every field is 2-dp [`Money`].
///
/// Invariant: `total_charges == brokerage + stt_charges + exchange_charges +
/// sebi_charges + stamp_duty + gst_charges + dp_charges`, exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub category: InstrumentCategory,
    pub side: Side,
    pub quantity: Decimal,
    pub turnover: Money,
    pub brokerage: Money,
    pub stt_charges: Money,
    pub exchange_charges: Money,
    pub sebi_charges: Money,
    pub stamp_duty: Money,
    pub gst_charges: Money,
    pub dp_charges: Money,
    pub total_charges: Money,
}

impl ChargeBreakdown {
    /// Sum of the seven charge components (what `total_charges` must equal).
    pub fn component_sum(&self) -> Result<Money, ChargeError> {
        [
            self.brokerage,
            self.stt_charges,
            self.exchange_charges,
            self.sebi_charges,
            self.stamp_duty,
            self.gst_charges,
            self.dp_charges,
        ]
        .into_iter()
        .try_fold(Money::ZERO, Money::checked_add)
        .ok_or(ChargeError::Overflow {
            what: "total charges",
        })
    }
}

/// Entry + exit legs priced together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub buy_leg: ChargeBreakdown,
    pub sell_leg: ChargeBreakdown,
    /// `min(buy_leg.quantity, sell_leg.quantity)`; profit/loss is measured on this.
    pub matched_quantity: Decimal,
    pub turnover: Money,
    pub total_charges: Money,
    pub gross_profit_loss: Money,
    pub net_profit_loss: Money,
}
