//! Command Line Interface for the DEX portfolio engine.
//!
//! Each invocation loads a seed, runs one command against the in-memory
//! state and prints the result.
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dex_data::{Seed, Store};
use dex_domain::entities::{AssetId, Transaction};
use dex_domain::enums::TransactionType;
use dex_domain::value_objects::{AssetPair, TransactionFilter};
use dex_execution::prelude::*;
use dotenv::dotenv;
use rust_decimal::{Decimal, RoundingStrategy};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dex-cli")]
#[command(about = "DEX portfolio, trading and liquidity CLI", long_about = None)]
struct Cli {
    /// JSON seed file. Falls back to the built-in demo data.
    #[arg(long, global = true, env = "DEX_SEED_PATH")]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show asset balances and the total portfolio value
    Portfolio,
    /// List liquidity pools and the user's positions
    Pools,
    /// Show market statistics and trading pairs
    Markets,
    /// Quote a trade without executing it
    Quote {
        /// Asset id to sell
        #[arg(long)]
        from: String,
        /// Asset id to buy
        #[arg(long)]
        to: String,
        /// Amount of the sold asset
        #[arg(long)]
        amount: Decimal,
    },
    /// Execute a trade at the spot rate
    Trade {
        /// Asset id to sell
        #[arg(long)]
        from: String,
        /// Asset id to buy
        #[arg(long)]
        to: String,
        /// Amount of the sold asset
        #[arg(long)]
        amount: Decimal,
    },
    /// Deposit both tokens of a pool
    AddLiquidity {
        /// Pool id (e.g., btc-usdt)
        #[arg(long)]
        pool: String,
        /// Token0 amount
        #[arg(long)]
        amount0: Decimal,
        /// Token1 amount
        #[arg(long)]
        amount1: Decimal,
    },
    /// Withdraw a fraction of a position
    RemoveLiquidity {
        /// Pool id (e.g., btc-usdt)
        #[arg(long)]
        pool: String,
        /// Fraction of the position to withdraw, in (0, 1]
        #[arg(long, default_value = "1")]
        fraction: Decimal,
    },
    /// Mint units of an asset
    Mint {
        /// Asset id
        #[arg(long)]
        asset: String,
        /// Amount to mint
        #[arg(long)]
        amount: Decimal,
    },
    /// Show the transaction history
    History {
        /// Only this transaction type
        #[arg(long, value_enum)]
        kind: Option<Kind>,
        /// Only transactions involving this symbol
        #[arg(long)]
        asset: Option<String>,
        /// Only transactions from the last N hours
        #[arg(long)]
        hours: Option<i64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    Mint,
}

impl From<Kind> for TransactionType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Swap => Self::Swap,
            Kind::AddLiquidity => Self::AddLiquidity,
            Kind::RemoveLiquidity => Self::RemoveLiquidity,
            Kind::Mint => Self::Mint,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env()?;

    let seed = match &cli.seed {
        Some(path) => Seed::from_json_file(path)
            .with_context(|| format!("failed to load seed from {}", path.display()))?,
        None => Seed::demo(),
    };
    let store = Store::from_seed(seed)?;
    info!(assets = store.assets().assets().len(), "Store loaded");

    match cli.command {
        Commands::Portfolio => print_portfolio(&store),
        Commands::Pools => print_pools(&store),
        Commands::Markets => print_markets(&store),
        Commands::Quote { from, to, amount } => {
            let engine = trade_engine(&store, config, from, to, amount);
            let pair = engine.try_quote()?;
            let preview = engine.preview().context("amount too large to quote")?;
            println!("📈 Quote");
            println!("════════════════════════════════════");
            println!("You pay:        {} {}", preview.from_amount, pair.from_asset.symbol);
            println!("You receive:    {} {}", preview.to_amount, pair.to_asset.symbol);
            println!("Rate:           {}", rate_label(&pair));
            println!("Price impact:   {}%", preview.price_impact);
            println!("Network fee:    {}", preview.fee);
            println!("Min received:   {}", preview.min_received);
            println!("════════════════════════════════════");
        }
        Commands::Trade { from, to, amount } => {
            let engine = trade_engine(&store, config, from, to, amount);
            let tx = engine.execute()?;
            println!("✅ Trade executed");
            print_transaction(&tx);
            print_portfolio(&store);
        }
        Commands::AddLiquidity {
            pool,
            amount0,
            amount1,
        } => {
            let receipt = liquidity_desk(&store, config).add_liquidity(&pool, amount0, amount1)?;
            println!("✅ Liquidity added");
            print_transaction(&receipt.transaction);
            if let Some(position) = receipt.position {
                println!(
                    "Position: {} / {} (share {:.4}%, value {})",
                    position.token0_amount,
                    position.token1_amount,
                    position.share * Decimal::ONE_HUNDRED,
                    format_usd(position.value)
                );
            }
        }
        Commands::RemoveLiquidity { pool, fraction } => {
            let receipt = liquidity_desk(&store, config).remove_liquidity(&pool, fraction)?;
            println!("✅ Liquidity removed");
            print_transaction(&receipt.transaction);
            if receipt.position.is_none() {
                println!("Position in {pool} closed");
            }
        }
        Commands::Mint { asset, amount } => {
            let minter = Minter::new(Arc::new(store.assets().clone()), store.ledger().clone(), config);
            let tx = minter.mint(&AssetId::new(asset), amount)?;
            println!("✅ Minted");
            print_transaction(&tx);
        }
        Commands::History { kind, asset, hours } => {
            let mut filter = TransactionFilter::new();
            if let Some(kind) = kind {
                filter = filter.with_type(kind.into());
            }
            if let Some(asset) = asset {
                filter = filter.with_asset(asset);
            }
            if let Some(hours) = hours {
                filter = filter.between(Some(hours_ago(hours)?), None);
            }
            let transactions = store.ledger().filter(&filter);
            println!("🧾 {} transaction(s)", transactions.len());
            for tx in &transactions {
                print_transaction(tx);
            }
        }
    }

    Ok(())
}

fn trade_engine(store: &Store, config: EngineConfig, from: String, to: String, amount: Decimal) -> TradeEngine {
    let mut engine = TradeEngine::new(Arc::new(store.assets().clone()), store.ledger().clone(), config);
    engine.select_pair(AssetId::new(from), AssetId::new(to));
    engine.set_amount(amount);
    engine
}

fn liquidity_desk(store: &Store, config: EngineConfig) -> LiquidityDesk {
    LiquidityDesk::new(
        Arc::new(store.assets().clone()),
        store.pools().clone(),
        store.ledger().clone(),
        config,
    )
}

fn print_portfolio(store: &Store) {
    println!("\n💼 Portfolio");
    println!(
        "{:<4} | {:<6} | {:<14} | {:<12} | {:<14}",
        "Id", "Symbol", "Balance", "Price", "Value"
    );
    println!("{}", "-".repeat(62));
    for asset in store.assets().assets() {
        println!(
            "{:<4} | {:<6} | {:<14} | {:<12} | {:<14}",
            asset.id,
            asset.symbol,
            asset.balance,
            asset.price,
            format_total(asset.value())
        );
    }
    println!("{}", "-".repeat(62));
    println!("Total value: {}", format_total(store.assets().total_value()));
}

fn print_pools(store: &Store) {
    println!("\n🏊 Pools");
    println!(
        "{:<10} | {:<10} | {:<8} | {:<16} | {:<14}",
        "Id", "Pair", "APR", "Liquidity", "Your liquidity"
    );
    println!("{}", "-".repeat(70));
    for pool in store.pools().pools() {
        println!(
            "{:<10} | {:<10} | {:<8} | {:<16} | {:<14}",
            pool.id,
            pool.pair_label(),
            format!("{}%", pool.apr),
            format_usd(pool.total_liquidity),
            format_usd(pool.user_liquidity)
        );
    }
    println!("Total value locked: {}", format_total(store.pools().total_value_locked()));

    let positions = store.pools().positions();
    if !positions.is_empty() {
        println!("\n📌 Positions");
        for position in positions {
            println!(
                "{}: {} / {} (share {:.4}%, value {})",
                position.pool_id,
                position.token0_amount,
                position.token1_amount,
                position.share * Decimal::ONE_HUNDRED,
                format_usd(position.value)
            );
        }
    }
}

fn print_markets(store: &Store) {
    let markets = store.markets();
    println!("\n📊 Markets");
    println!(
        "{:<10} | {:<12} | {:<16} | {:<8} | {:<16}",
        "Pair", "Price", "Volume 24h", "Change", "TVL"
    );
    println!("{}", "-".repeat(72));
    for stats in markets.market_stats() {
        println!(
            "{:<10} | {:<12} | {:<16} | {:<8} | {:<16}",
            stats.pair,
            format_usd(stats.price),
            format_usd(stats.volume24h),
            format!("{}%", stats.change24h),
            format_usd(stats.tvl)
        );
    }
    println!("Total volume 24h: {}", format_total(markets.total_volume_24h()));
    println!("Total TVL:        {}", format_total(markets.total_tvl()));
}

fn print_transaction(tx: &Transaction) {
    println!(
        "#{:<4} {:<17} {} {} → {} {} | {} | {} | fee {} | {}",
        tx.id,
        tx.tx_type,
        tx.from_amount,
        tx.from_asset,
        tx.to_amount,
        tx.to_asset,
        tx.timestamp.format("%Y-%m-%d %H:%M"),
        tx.status,
        tx.fee,
        tx.hash
    );
}

/// Start of a `--hours` window ending now.
fn hours_ago(hours: i64) -> Result<DateTime<Utc>> {
    Duration::try_hours(hours)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .context("--hours out of range")
}

/// Direction-explicit rate: `rate` is to.price / from.price, the source units
/// one destination unit costs.
fn rate_label(pair: &AssetPair) -> String {
    format!("1 {} = {} {}", pair.to_asset.symbol, pair.rate, pair.from_asset.symbol)
}

/// Formats a computed total, which is `None` when it overflowed.
fn format_total(value: Option<Decimal>) -> String {
    value.map_or_else(|| "out of range".to_string(), format_usd)
}

/// Formats a USD amount with two decimals and thousands separators.
fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(0)), "$0.00");
        assert_eq!(format_usd(dec!(78000)), "$78,000.00");
        assert_eq!(format_usd(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_usd(dec!(999.995)), "$1,000.00");
        assert_eq!(format_usd(dec!(-1.2)), "-$1.20");
    }

    #[test]
    fn test_rate_label_names_direction() {
        use dex_domain::entities::Asset;
        use dex_domain::enums::AssetType;

        let ordi = Asset::new("2", "ORDI", "Ordinals", dec!(1000), dec!(50), AssetType::Brc20);
        let btc = Asset::new("1", "BTC", "Bitcoin", dec!(1.2), dec!(65000), AssetType::Sat20);
        let pair = AssetPair::new(ordi, btc).unwrap();
        assert_eq!(pair.rate, dec!(1300));
        assert_eq!(rate_label(&pair), format!("1 BTC = {} ORDI", pair.rate));
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(Some(dec!(88000))), "$88,000.00");
        assert_eq!(format_total(None), "out of range");
    }

    #[test]
    fn test_hours_ago_bounds() {
        assert!(hours_ago(i64::MAX).is_err());
        assert!(hours_ago(i64::MIN).is_err());
        let window = Utc::now() - hours_ago(24).unwrap();
        assert!(window >= Duration::hours(24) && window < Duration::hours(25));
    }

    #[test]
    fn test_cli_parses_trade() {
        let cli = Cli::try_parse_from([
            "dex-cli", "trade", "--from", "1", "--to", "4", "--amount", "0.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Trade { from, to, amount } => {
                assert_eq!(from, "1");
                assert_eq!(to, "4");
                assert_eq!(amount, dec!(0.5));
            }
            _ => panic!("expected trade"),
        }
    }
}
