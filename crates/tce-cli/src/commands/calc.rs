//! tce leg / round-trip / breakeven / rates

use anyhow::{anyhow, bail, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tce_charges::{
    break_even_per_unit, break_even_price, compute_leg, compute_round_trip, ChargeBreakdown,
    ChargeInput, CombinedResult, InstrumentCategory, LegFill, Money, OrderSummary, OverrideState,
    RateRegistry, RoundTripRequest, Side,
};
use tce_config::{ConfigMode, TraderSettings};
use tracing::warn;

use super::{load, ConfigArgs};

pub struct LegArgs {
    pub category: InstrumentCategory,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
    pub brokerage: Option<Decimal>,
    pub override_charges: Option<Decimal>,
}

pub struct RoundTripArgs {
    pub category: InstrumentCategory,
    pub qty: Option<Decimal>,
    pub buy_qty: Option<Decimal>,
    pub sell_qty: Option<Decimal>,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub brokerage: Option<Decimal>,
}

pub struct BreakevenArgs {
    pub total_charges: Decimal,
    pub qty: Decimal,
    pub entry: Option<(Decimal, Side)>,
}

/// Explicit flag wins, then the configured default, then 0 (inside the engine).
fn brokerage_or_default(explicit: Option<Decimal>, settings: &TraderSettings) -> Option<Decimal> {
    explicit.or(settings.default_brokerage)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_breakdown(prefix: &str, bd: &ChargeBreakdown) {
    println!("{prefix}category={}", bd.category);
    println!("{prefix}side={}", bd.side);
    println!("{prefix}quantity={}", bd.quantity);
    println!("{prefix}turnover={}", bd.turnover);
    println!("{prefix}brokerage={}", bd.brokerage);
    println!("{prefix}stt_charges={}", bd.stt_charges);
    println!("{prefix}exchange_charges={}", bd.exchange_charges);
    println!("{prefix}sebi_charges={}", bd.sebi_charges);
    println!("{prefix}stamp_duty={}", bd.stamp_duty);
    println!("{prefix}gst_charges={}", bd.gst_charges);
    println!("{prefix}dp_charges={}", bd.dp_charges);
    println!("{prefix}total_charges={}", bd.total_charges);
}

// ---------------------------------------------------------------------------
// tce leg
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LegOutput<'a> {
    breakdown: &'a ChargeBreakdown,
    #[serde(rename = "override")]
    override_state: &'a OverrideState,
    summary: &'a OrderSummary,
    /// `None` when no capital is configured.
    capital_ok: Option<bool>,
}

pub fn run_leg(cfg: &ConfigArgs, args: LegArgs, json: bool) -> Result<()> {
    let loaded = load(cfg, ConfigMode::Journal)?;
    let settings = &loaded.settings;

    let input = ChargeInput::new(
        args.category,
        args.side,
        args.price,
        args.qty,
        brokerage_or_default(args.brokerage, settings),
    );
    let bd = compute_leg(&loaded.registry, &input)?;

    let ov = match args.override_charges {
        Some(manual) => OverrideState::apply_override(&bd, manual)?,
        None => {
            if !args.category.is_statutory() {
                warn!("category 'other' has no statutory schedule; pass --override-charges from the contract note");
            }
            OverrideState::for_breakdown(&bd)
        }
    };
    let summary = OrderSummary::build(&bd, &ov)?;

    let capital_ok = settings.capital_covers(summary.total_order_amount.value());
    if capital_ok == Some(false) {
        let available = settings.available_capital.unwrap_or_default();
        if settings.enforce_capital {
            bail!(
                "INSUFFICIENT_CAPITAL: order amount {} exceeds available capital {}",
                summary.total_order_amount,
                available
            );
        }
        warn!(
            order_amount = %summary.total_order_amount,
            available_capital = %available,
            "order amount exceeds available capital"
        );
    }

    if json {
        return print_json(&LegOutput {
            breakdown: &bd,
            override_state: &ov,
            summary: &summary,
            capital_ok,
        });
    }

    print_breakdown("", &bd);
    println!("computed_non_brokerage={}", ov.computed_value());
    println!("override_edited={}", ov.is_edited());
    println!("effective_non_brokerage={}", summary.effective_non_brokerage);
    println!("effective_total_charges={}", summary.total_charges);
    println!("total_order_amount={}", summary.total_order_amount);
    println!("break_even_per_unit={}", summary.break_even_per_unit);
    if let Some(ok) = capital_ok {
        println!("capital_ok={ok}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// tce round-trip
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RoundTripOutput<'a> {
    #[serde(flatten)]
    result: &'a CombinedResult,
    break_even_per_unit: Decimal,
}

pub fn run_round_trip(cfg: &ConfigArgs, args: RoundTripArgs, json: bool) -> Result<()> {
    let loaded = load(cfg, ConfigMode::Calculator)?;

    let total_brokerage = brokerage_or_default(args.brokerage, &loaded.settings);
    let req = match (args.qty, args.buy_qty, args.sell_qty) {
        (Some(qty), None, None) => RoundTripRequest::matched(
            args.category,
            qty,
            args.buy_price,
            args.sell_price,
            total_brokerage,
        ),
        (None, Some(buy_qty), Some(sell_qty)) => RoundTripRequest::split(
            args.category,
            LegFill::new(args.buy_price, buy_qty),
            LegFill::new(args.sell_price, sell_qty),
            total_brokerage,
        ),
        _ => bail!("give either --qty, or both --buy-qty and --sell-qty"),
    };

    let r = compute_round_trip(&loaded.registry, &req)?;
    if req.buy.quantity != req.sell.quantity {
        warn!(
            buy_qty = %req.buy.quantity,
            sell_qty = %req.sell.quantity,
            matched = %r.matched_quantity,
            "leg quantities differ; profit/loss uses the matched quantity"
        );
    }
    let per_unit = break_even_per_unit(r.total_charges, r.matched_quantity)?;

    if json {
        return print_json(&RoundTripOutput {
            result: &r,
            break_even_per_unit: per_unit,
        });
    }

    print_breakdown("buy.", &r.buy_leg);
    print_breakdown("sell.", &r.sell_leg);
    println!("matched_quantity={}", r.matched_quantity);
    println!("turnover={}", r.turnover);
    println!("total_charges={}", r.total_charges);
    println!("gross_profit_loss={}", r.gross_profit_loss);
    println!("net_profit_loss={}", r.net_profit_loss);
    println!("break_even_per_unit={per_unit}");
    Ok(())
}

// ---------------------------------------------------------------------------
// tce breakeven
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BreakevenOutput {
    total_charges: Money,
    quantity: Decimal,
    break_even_per_unit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    break_even_price: Option<Decimal>,
}

pub fn run_breakeven(args: BreakevenArgs, json: bool) -> Result<()> {
    let total_charges = Money::checked_round(args.total_charges)
        .ok_or_else(|| anyhow!("--total-charges out of range: {}", args.total_charges))?;
    let per_unit = break_even_per_unit(total_charges, args.qty)?;
    let price = match args.entry {
        Some((entry_price, side)) => Some(break_even_price(side, entry_price, total_charges, args.qty)?),
        None => None,
    };

    if json {
        return print_json(&BreakevenOutput {
            total_charges,
            quantity: args.qty,
            break_even_per_unit: per_unit,
            break_even_price: price,
        });
    }

    println!("total_charges={total_charges}");
    println!("quantity={}", args.qty);
    println!("break_even_per_unit={per_unit}");
    if let Some(p) = price {
        println!("break_even_price={p}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// tce rates
// ---------------------------------------------------------------------------

pub fn run_rates(cfg: &ConfigArgs, category: Option<InstrumentCategory>, json: bool) -> Result<()> {
    let loaded = load(cfg, ConfigMode::Calculator)?;
    let registry: &RateRegistry = &loaded.registry;

    let categories: Vec<InstrumentCategory> = match category {
        Some(c) => vec![c],
        None => InstrumentCategory::ALL.to_vec(),
    };

    if json {
        let map: serde_json::Map<String, serde_json::Value> = categories
            .iter()
            .map(|c| Ok((c.as_str().to_string(), serde_json::to_value(registry.lookup(*c))?)))
            .collect::<Result<_>>()?;
        return print_json(&map);
    }

    for c in categories {
        let s = registry.lookup(c);
        println!("{c}.stt.buy={}", s.stt.buy);
        println!("{c}.stt.sell={}", s.stt.sell);
        println!("{c}.exchange={}", s.exchange_rate);
        println!("{c}.sebi={}", s.sebi_rate);
        println!("{c}.stamp_duty={}", s.stamp_duty_rate);
        println!("{c}.gst={}", s.gst_rate);
        println!("{c}.dp_flat_fee={}", s.dp_flat_fee);
    }
    Ok(())
}
