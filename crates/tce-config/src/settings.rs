//! Trader settings: the persistence-side collaborator the trade dialogs read
//! before submitting (default brokerage pre-fill, capital sufficiency).
//!
//! The charges engine never looks at these values. Callers pre-fill
//! `brokerage` from [`TraderSettings::default_brokerage`] and decide for
//! themselves whether an order larger than the available capital is allowed.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TraderSettings {
    /// Brokerage used when the caller does not supply one.
    pub default_brokerage: Option<Decimal>,
    /// Capital available for new orders.
    pub available_capital: Option<Decimal>,
    /// If true, an order exceeding `available_capital` is refused instead of warned.
    pub enforce_capital: bool,
}

impl TraderSettings {
    /// Build from canonical config JSON (produced by `load_layered_yaml*`).
    ///
    /// All fields are optional:
    /// - settings.default_brokerage (number or string, >= 0)
    /// - settings.available_capital (number or string, >= 0)
    /// - settings.enforce_capital (bool, default false)
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let default_brokerage = decimal_at(cfg, "/settings/default_brokerage")?;
        let available_capital = decimal_at(cfg, "/settings/available_capital")?;

        for (name, v) in [
            ("settings.default_brokerage", default_brokerage),
            ("settings.available_capital", available_capital),
        ] {
            if let Some(d) = v {
                if d < Decimal::ZERO {
                    return Err(anyhow!("{name} must be >= 0 (got {d})"));
                }
            }
        }

        let enforce_capital = match cfg.pointer("/settings/enforce_capital") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(anyhow!(
                    "settings.enforce_capital must be a bool (got {other})"
                ))
            }
        };

        Ok(Self {
            default_brokerage,
            available_capital,
            enforce_capital,
        })
    }

    /// `Some(true)` when `order_amount` fits the available capital,
    /// `None` when no capital is configured.
    pub fn capital_covers(&self, order_amount: Decimal) -> Option<bool> {
        self.available_capital.map(|cap| order_amount <= cap)
    }
}

/// Read a decimal leaf at `pointer`. Accepts a JSON number or a numeric string.
///
/// Returns `Ok(None)` when the pointer is absent or null. Numbers are parsed
/// from their textual form (scientific notation included) so `0.0000345`
/// arrives as exactly that, not as the nearest binary float.
pub fn decimal_at(cfg: &Value, pointer: &str) -> Result<Option<Decimal>> {
    match cfg.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => parse_decimal_text(&n.to_string())
            .map(Some)
            .with_context(|| format!("config {pointer} is not a decimal: {n}")),
        Some(Value::String(s)) => parse_decimal_text(s)
            .map(Some)
            .with_context(|| format!("config {pointer} is not a decimal: {s:?}")),
        Some(other) => Err(anyhow!(
            "config {pointer} must be a number or numeric string (got {other})"
        )),
    }
}

fn parse_decimal_text(raw: &str) -> Result<Decimal> {
    let t = raw.trim();
    if t.contains(|c| c == 'e' || c == 'E') {
        return Decimal::from_scientific(t).map_err(|e| anyhow!("{e}"));
    }
    Decimal::from_str(t).map_err(|e| anyhow!("{e}"))
}
