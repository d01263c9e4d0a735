//! tce-charges
//!
//! Trade cost engine: statutory charges and profit/loss for equity and
//! derivative trades.
//! - Rate schedule registry, injectable (reference set or config)
//! - Single-leg breakdown, every component rounded to 2 dp before summing
//! - Round trip with one brokerage split across both legs
//! - Manual override of the non-brokerage figure, sticky until reset
//! - Order amount and breakeven derivations
//! - Pure deterministic logic (no IO, no shared state)

mod error;
mod leg;
mod money;
mod overrides;
mod round_trip;
mod summary;
mod types;

pub mod registry;

pub use error::ChargeError;
pub use leg::{compute_leg, turnover, validate_input};
pub use money::{round2, Money, MONEY_DP};
pub use overrides::{non_brokerage_charges, OverrideState};
pub use registry::{RateRegistry, RateSchedule, SideRates};
pub use round_trip::{compute_round_trip, LegFill, RoundTripRequest};
pub use summary::{break_even_per_unit, break_even_price, total_order_amount, OrderSummary};
pub use types::{ChargeBreakdown, ChargeInput, CombinedResult, InstrumentCategory, Side};
