use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tce_charges::{InstrumentCategory, Side};

mod commands;

use commands::calc::{self, BreakevenArgs, LegArgs, RoundTripArgs};
use commands::ConfigArgs;

#[derive(Parser)]
#[command(name = "tce")]
#[command(about = "Trade charges calculator", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> rates -> settings...).
    /// Falls back to TCE_CONFIG (comma separated) when omitted.
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Fail instead of warn when config carries keys nothing reads.
    #[arg(long, global = true, default_value_t = false)]
    strict_config: bool,

    /// Print results as JSON instead of key=value lines.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Charge breakdown for one leg (add-trade dialog)
    Leg {
        /// options_derivative | futures_derivative | intraday_equity | delivery_equity | other
        #[arg(long)]
        category: InstrumentCategory,

        /// buy | sell
        #[arg(long)]
        side: Side,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        qty: Decimal,

        /// Absolute brokerage for this leg. Defaults to settings.default_brokerage, else 0.
        #[arg(long)]
        brokerage: Option<Decimal>,

        /// Non-brokerage charges copied from a contract note, replacing the computed figure.
        #[arg(long = "override-charges")]
        override_charges: Option<Decimal>,
    },

    /// Buy + sell legs with one brokerage split evenly
    RoundTrip {
        #[arg(long)]
        category: InstrumentCategory,

        /// Quantity for both legs
        #[arg(long, required_unless_present_all = ["buy_qty", "sell_qty"], conflicts_with_all = ["buy_qty", "sell_qty"])]
        qty: Option<Decimal>,

        /// Buy fill quantity (with --sell-qty, for partial exits)
        #[arg(long, requires = "sell_qty")]
        buy_qty: Option<Decimal>,

        /// Sell fill quantity (with --buy-qty)
        #[arg(long, requires = "buy_qty")]
        sell_qty: Option<Decimal>,

        #[arg(long)]
        buy_price: Decimal,

        #[arg(long)]
        sell_price: Decimal,

        /// Brokerage for the whole round trip. Defaults to settings.default_brokerage, else 0.
        #[arg(long)]
        brokerage: Option<Decimal>,
    },

    /// Per-unit breakeven move (and exit price when an entry is given)
    Breakeven {
        #[arg(long)]
        total_charges: Decimal,

        #[arg(long)]
        qty: Decimal,

        /// Entry price of the position
        #[arg(long, requires = "side")]
        entry_price: Option<Decimal>,

        /// Side the position was opened on
        #[arg(long, requires = "entry_price")]
        side: Option<Side>,
    },

    /// Print the effective rate schedules
    Rates {
        /// Only this category
        #[arg(long)]
        category: Option<InstrumentCategory>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn init_tracing() {
    // stdout carries results; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Dev-time convenience: pick up TCE_CONFIG / RUST_LOG from .env.local if present.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    let cfg = ConfigArgs {
        paths: cli.config_paths,
        strict: cli.strict_config,
    };

    match cli.cmd {
        Commands::Leg {
            category,
            side,
            price,
            qty,
            brokerage,
            override_charges,
        } => calc::run_leg(
            &cfg,
            LegArgs {
                category,
                side,
                price,
                qty,
                brokerage,
                override_charges,
            },
            cli.json,
        )?,

        Commands::RoundTrip {
            category,
            qty,
            buy_qty,
            sell_qty,
            buy_price,
            sell_price,
            brokerage,
        } => calc::run_round_trip(
            &cfg,
            RoundTripArgs {
                category,
                qty,
                buy_qty,
                sell_qty,
                buy_price,
                sell_price,
                brokerage,
            },
            cli.json,
        )?,

        Commands::Breakeven {
            total_charges,
            qty,
            entry_price,
            side,
        } => calc::run_breakeven(
            BreakevenArgs {
                total_charges,
                qty,
                entry: entry_price.zip(side),
            },
            cli.json,
        )?,

        Commands::Rates { category } => calc::run_rates(&cfg, category, cli.json)?,

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = tce_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}
