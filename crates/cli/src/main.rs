//! Command Line Interface for the Mooner launchpad core.
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use mooner_data::providers::{
    FeedConfig, FlywheelClient, JupiterFeed, MigratedPoolClient, MigratedPoolConfig,
    PoolCreatedPayload,
};
use mooner_data::repositories::{Database, PoolQuery, StatusFilter, StoreSortField};
use mooner_data::{DataError, HistoricalStore};
use mooner_domain::labels::LabelConfig;
use mooner_domain::{ListingCategory, ListingEntry, SortDirection, SortField, TradeDirection};
use mooner_listing::{ListingConfig, ListingReconciler};
use mooner_protocols::prelude::*;
use mooner_resolver::{
    CreatorFeeConfig, CreatorFeeService, GuardedResolver, PoolHandle, PoolResolver, QuoteTracker,
    ResolverConfig, VenueState,
};
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mooner")]
#[command(about = "Mooner launchpad pool and listing tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the discovery listings (live feed merged with the pool store)
    Explore {
        /// Only this category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,

        /// Sort the live rows by this field instead of keeping the feed order
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,

        /// Sort ascending
        #[arg(long)]
        asc: bool,

        /// Rows to print per category
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// List stored pools missing from every live category
    Missing,
    /// Page through the pool store
    Pools {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 50)]
        page_size: u32,

        /// active, migrated or all
        #[arg(long, default_value = "all")]
        status: String,

        /// created_at, current_marketcap_usd, total_fees_collected_sol or updated_at
        #[arg(long, default_value = "created_at")]
        sort_by: String,

        #[arg(long)]
        asc: bool,

        /// Name or symbol fragment, or an exact base mint
        #[arg(long)]
        search: Option<String>,
    },
    /// Pools launched by a creator wallet
    CreatorPools {
        #[arg(long)]
        creator: String,
    },
    /// Stored supply of a mint
    Supply {
        #[arg(long)]
        mint: String,
    },
    /// Create the pool store schema
    Migrate,
    /// Resolve a token to the venue currently hosting it
    Resolve {
        /// Base mint
        token: String,
    },
    /// Quote a swap against the resolved pool
    Quote {
        /// Base mint
        token: String,

        /// Input amount in minor units
        amount: u64,

        /// Sell the token instead of buying it
        #[arg(long)]
        sell: bool,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u16>,
    },
    /// Creator fees claimable by a wallet
    Fees {
        /// Wallet checked for creator ownership
        #[arg(long)]
        wallet: String,

        /// Base mints to look up
        #[arg(required = true)]
        mints: Vec<String>,
    },
    /// Volume, fees and APR of a graduated token's pool
    PoolMetrics {
        /// Migrated pool address
        pool: String,

        /// Base mint, when it is not the pool's token A
        #[arg(long)]
        mint: Option<String>,
    },
    /// Ledger view of a mint's resolved pool: decimals, reserves and clock
    Ledger {
        /// Base mint
        #[arg(long)]
        mint: String,
    },
    /// Flywheel service
    Flywheel {
        #[command(subcommand)]
        command: FlywheelCommand,
    },
}

#[derive(Subcommand)]
enum FlywheelCommand {
    /// Aggregate buyback statistics
    Stats,
    /// Latest buyback and burn operations
    Recent,
    /// Register a newly created pool
    Notify {
        #[arg(long)]
        pool: String,
        #[arg(long)]
        base_mint: String,
        #[arg(long)]
        creator: String,
        #[arg(long)]
        quote_mint: Option<String>,
        #[arg(long)]
        config_key: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        symbol: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    New,
    Soon,
    Bonded,
}

impl From<CategoryArg> for ListingCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::New => ListingCategory::New,
            CategoryArg::Soon => ListingCategory::AboutToGraduate,
            CategoryArg::Bonded => ListingCategory::Graduated,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Created,
    Graduated,
    Mcap,
    Price,
    Volume,
    Liquidity,
    Holders,
    Curve,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Created => SortField::CreatedAt,
            SortArg::Graduated => SortField::GraduatedAt,
            SortArg::Mcap => SortField::MarketCap,
            SortArg::Price => SortField::Price,
            SortArg::Volume => SortField::Volume24h,
            SortArg::Liquidity => SortField::Liquidity,
            SortArg::Holders => SortField::HolderCount,
            SortArg::Curve => SortField::BondingCurve,
        }
    }
}

/// Backfill used when no pool store is configured.
struct NoHistory;

#[async_trait]
impl HistoricalStore for NoHistory {
    async fn recent_pools(&self, _limit: u32) -> Result<Vec<ListingEntry>, DataError> {
        Ok(Vec::new())
    }
}

fn direction(asc: bool) -> SortDirection {
    if asc {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    }
}

async fn database() -> Result<Database> {
    let url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in .env or environment")?;
    Ok(Database::connect(&url).await?)
}

fn feed() -> Result<JupiterFeed> {
    let mut config = FeedConfig::default();
    if let Ok(url) = env::var("LIVE_FEED_URL") {
        config.base_url = url;
    }
    Ok(JupiterFeed::new(config)?)
}

async fn reconciler() -> Result<ListingReconciler> {
    let feed = Arc::new(feed()?);

    let store: Arc<dyn HistoricalStore> = if env::var("DATABASE_URL").is_ok() {
        Arc::new(database().await?.pools())
    } else {
        warn!("DATABASE_URL not set, listing without historical backfill");
        Arc::new(NoHistory)
    };

    Ok(ListingReconciler::new(feed, store, ListingConfig::default()))
}

fn rpc_provider() -> Arc<RpcProvider> {
    let mut config = RpcConfig::default();
    if let Ok(url) = env::var("RPC_URL") {
        config = config.with_url(url);
    }
    Arc::new(RpcProvider::new(config))
}

fn resolver(rpc: &Arc<RpcProvider>) -> GuardedResolver {
    let resolver = PoolResolver::new(
        Arc::new(RpcBondingCurve::new(rpc.clone())),
        Arc::new(RpcCpAmm::new(rpc.clone())),
        rpc.clone(),
        ResolverConfig::default(),
    );
    GuardedResolver::new(Arc::new(resolver))
}

fn creator_fee_config() -> CreatorFeeConfig {
    let mut config = CreatorFeeConfig::default();
    if let Some(price) = env::var("SOL_PRICE_USD")
        .ok()
        .and_then(|value| Decimal::from_str(&value).ok())
    {
        config.sol_price_usd = price;
    }
    config
}

fn parse_pubkeys(values: &[String]) -> Result<Vec<Pubkey>> {
    values
        .iter()
        .map(|value| Pubkey::from_str(value).with_context(|| format!("invalid address {value}")))
        .collect()
}

fn print_handle(handle: &PoolHandle) {
    println!("Venue:    {}", handle.venue_kind);
    println!("Pool:     {}", handle.pool_address);
    for (side, asset) in [("Base", &handle.base), ("Quote", &handle.quote)] {
        println!(
            "{side:<5}     {} {} ({} decimals, {:?})",
            asset.symbol, asset.mint, asset.decimals, asset.decimals_source
        );
    }
    println!(
        "Reserves: {} base / {} quote",
        handle.reserves.base, handle.reserves.quote
    );
    println!("Curve:    {}%", handle.curve_progress_pct());
}

fn parse_cutoff(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}

fn label_config() -> LabelConfig {
    LabelConfig {
        legacy_pool_config: env::var("LEGACY_POOL_CONFIG").ok(),
        regular_pool_config: env::var("REGULAR_POOL_CONFIG").ok(),
        legacy_cutoff: env::var("LEGACY_CUTOFF_DATE")
            .ok()
            .and_then(|value| parse_cutoff(&value)),
    }
}

fn print_entries(entries: &[ListingEntry], limit: usize, labels: &LabelConfig) {
    println!(
        "{:<12} | {:<10} | {:>14} | {:>14} | {:>8} | {:<6} | {:<44}",
        "Name", "Symbol", "Price USD", "MCap USD", "Curve %", "Label", "Mint"
    );
    println!("{}", "-".repeat(124));
    for entry in entries.iter().take(limit) {
        let label = if labels.is_enabled() {
            labels.label(entry.created_at).map_or("", |l| l.text())
        } else {
            ""
        };
        let fmt = |v: Option<Decimal>| v.map_or_else(|| "-".to_string(), |d| d.round_dp(6).to_string());
        println!(
            "{:<12} | {:<10} | {:>14} | {:>14} | {:>8} | {:<6} | {:<44}",
            entry.name.chars().take(12).collect::<String>(),
            entry.symbol.chars().take(10).collect::<String>(),
            fmt(entry.price_usd),
            fmt(entry.market_cap_usd),
            fmt(entry.bonding_curve_pct),
            label,
            entry.token_id
        );
    }
    if entries.len() > limit {
        println!("... {} more", entries.len() - limit);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore {
            category,
            sort,
            asc,
            limit,
        } => {
            let reconciler = reconciler().await?;
            let labels = label_config();

            let listings = match category {
                Some(category) => {
                    let sort = sort.map(|field| (field.into(), direction(asc)));
                    vec![reconciler.category(category.into(), sort).await?]
                }
                None => reconciler.listings().await?,
            };

            for listing in listings {
                println!("\n📈 {} ({} rows)", listing.category.title(), listing.entries.len());
                print_entries(&listing.entries, limit, &labels);
            }
        }
        Commands::Missing => {
            let missing = reconciler().await?.historical_only().await?;
            println!("🔍 {} stored pools not in the live feed", missing.len());
            print_entries(&missing, missing.len(), &label_config());
        }
        Commands::Pools {
            page,
            page_size,
            status,
            sort_by,
            asc,
            search,
        } => {
            let repo = database().await?.pools();
            let result = repo
                .list(PoolQuery {
                    page,
                    page_size,
                    status: StatusFilter::parse(&status),
                    sort_by: StoreSortField::parse(&sort_by),
                    sort_dir: direction(asc),
                    search,
                })
                .await?;

            println!(
                "📄 Page {} ({} per page) of {} pools{}",
                result.page,
                result.page_size,
                result.total,
                if result.has_more { ", more available" } else { "" }
            );
            let entries: Vec<ListingEntry> =
                result.pools.iter().map(|p| p.to_listing_entry()).collect();
            print_entries(&entries, entries.len(), &label_config());
        }
        Commands::CreatorPools { creator } => {
            let pools = database().await?.pools().find_by_creator(&creator).await?;
            println!(
                "👤 {} pools by {} ({} migrated)",
                pools.total_pools, creator, pools.migrated_pools
            );
            let entries: Vec<ListingEntry> =
                pools.pools.iter().map(|p| p.to_listing_entry()).collect();
            print_entries(&entries, entries.len(), &label_config());
        }
        Commands::Supply { mint } => {
            let supply = database().await?.pools().find_supply(&mint).await?;
            if !supply.found {
                println!("❌ No stored pool for {mint}");
                return Ok(());
            }
            let fmt = |v: Option<Decimal>| v.map_or_else(|| "-".to_string(), |d| d.to_string());
            println!("Total supply:       {}", fmt(supply.total_supply));
            println!("Circulating supply: {}", fmt(supply.circulating_supply));
        }
        Commands::Migrate => {
            database().await?.migrate().await?;
            info!("Pool store schema is up to date");
        }
        Commands::Resolve { token } => {
            let rpc = rpc_provider();
            let handle = resolver(&rpc).resolve(&token, false).await?;
            println!("🔎 {token}");
            print_handle(&handle);
        }
        Commands::Quote {
            token,
            amount,
            sell,
            slippage_bps,
        } => {
            let rpc = rpc_provider();
            let guard = resolver(&rpc);
            let handle = guard.resolve(&token, false).await?;
            print_handle(&handle);

            let direction = if sell {
                TradeDirection::Sell
            } else {
                TradeDirection::Buy
            };
            let slippage_bps =
                slippage_bps.unwrap_or(guard.inner().config().default_slippage_bps);
            let tracker = QuoteTracker::new();
            match tracker
                .refresh(guard.inner(), &handle, direction, amount, slippage_bps)
                .await
            {
                Ok(Some(quote)) => {
                    println!("\n💱 {direction:?} {amount}");
                    println!("Amount out:     {}", quote.amount_out);
                    println!("Minimum out:    {}", quote.minimum_amount_out);
                    println!("Fee:            {}", quote.fee_amount);
                    println!("Price impact:   {}%", quote.price_impact_pct.round_dp(4));
                }
                Ok(None) => println!("\nNo quote for {amount} (amount too small or swaps paused)"),
                Err(e) => println!("\n❌ Quote failed: {e}"),
            }
        }
        Commands::Fees { wallet, mints } => {
            let wallet = Pubkey::from_str(&wallet).context("invalid wallet address")?;
            let mints = parse_pubkeys(&mints)?;
            let venue = Arc::new(RpcBondingCurve::new(rpc_provider()));
            let service = CreatorFeeService::new(venue, creator_fee_config());

            let (fees, totals) = service.summary(&mints, &wallet).await;
            println!(
                "{:<44} | {:>14} | {:>14} | {:>12} | {:<7} | {:<8}",
                "Mint", "Quote fee", "Base fee", "USD", "Creator", "Migrated"
            );
            println!("{}", "-".repeat(112));
            for fee in &fees {
                println!(
                    "{:<44} | {:>14} | {:>14} | {:>12} | {:<7} | {:<8}",
                    fee.base_mint,
                    fee.creator_quote_fee,
                    fee.creator_base_fee,
                    fee.quote_fee_usd.round_dp(2),
                    fee.is_creator,
                    fee.is_migrated
                );
            }
            println!(
                "\n💰 {} claimable pools, {} USD",
                totals.claimable_count,
                totals.total_quote_fee_usd.round_dp(2)
            );
        }
        Commands::PoolMetrics { pool, mint } => {
            let mut config = MigratedPoolConfig::default();
            if let Ok(url) = env::var("MIGRATED_POOL_API_URL") {
                config.base_url = url;
            }
            let client = MigratedPoolClient::new(config)?;
            let feed = feed()?;

            let Some(details) = client.details(&feed, &pool, mint.as_deref()).await else {
                println!("❌ Pool {pool} unavailable");
                return Ok(());
            };
            let p = &details.pool;
            println!("🏊 {} ({})", p.pool_name, p.pool_address);
            println!(
                "{} {} ({} USD) / {} {} ({} USD)",
                p.token_a_amount, p.token_a_symbol, p.token_a_amount_usd,
                p.token_b_amount, p.token_b_symbol, p.token_b_amount_usd
            );
            println!("Price: {}  TVL: {}  APR: {}%", p.pool_price, p.tvl, p.apr);
            match &details.metrics {
                Some(m) => {
                    println!("Volume 24h/7d/30d: {} / {} / {}", m.volume24h, m.volume7d, m.volume30d);
                    println!(
                        "LP fees 24h/7d/30d: {} / {} / {}",
                        m.lp_fee24h, m.lp_fee7d, m.lp_fee30d
                    );
                    println!("Total fees 24h: {}  Fee/TVL: {}", m.total_fee24h(), m.fee_tvl_ratio);
                }
                None => println!("Metrics unavailable"),
            }
            if let Some(feed_pool) = &details.feed_pool {
                let entry = feed_pool.to_listing_entry();
                print_entries(&[entry], 1, &label_config());
            }
        }
        Commands::Ledger { mint } => {
            let mint = Pubkey::from_str(&mint).context("invalid mint address")?;
            let rpc = rpc_provider();
            println!("📡 RPC: {}", rpc.url());

            let guard = resolver(&rpc);
            match guard.inner().resolve_mint(&mint).await {
                Ok(handle) => {
                    print_handle(&handle);
                    let activation = match &handle.venue_state {
                        VenueState::BondingCurve { config } => config.activation_type,
                        VenueState::Migrated { pool_state, .. } => pool_state.activation_type,
                    };
                    match rpc.current_point(activation).await {
                        Ok(point) => println!("Clock:    {point} ({activation:?})"),
                        Err(e) => println!("Clock:    unavailable ({e})"),
                    }
                }
                Err(e) => {
                    let pool = derive_customizable_pool_address(&mint, &native_mint());
                    println!("❌ {e} (derived migrated pool would be {pool})");
                }
            }
        }
        Commands::Flywheel { command } => {
            let url = env::var("FLYWHEEL_API_URL")
                .unwrap_or_else(|_| FlywheelClient::DEFAULT_URL.to_string());
            let client = FlywheelClient::new(url, Duration::from_secs(10))?;

            match command {
                FlywheelCommand::Stats => match client.stats().await {
                    Some(stats) => {
                        println!("Fees collected:    {} SOL", stats.total_fees_collected_sol);
                        println!("Used for buyback:  {} SOL", stats.total_sol_used_for_buyback);
                        println!("Tokens bought:     {}", stats.total_tokens_bought);
                        println!("Tokens burned:     {}", stats.total_tokens_burned);
                        println!(
                            "Pools:             {} ({} active)",
                            stats.total_pools, stats.active_pools
                        );
                    }
                    None => println!("❌ Flywheel stats unavailable"),
                },
                FlywheelCommand::Recent => {
                    for op in client.recent_operations().await {
                        println!(
                            "{} | {:<10} | {} {} | {}",
                            op.executed_at.format("%Y-%m-%d %H:%M"),
                            op.operation_type,
                            op.amount,
                            op.currency,
                            op.tx_signature.as_deref().unwrap_or("-")
                        );
                    }
                }
                FlywheelCommand::Notify {
                    pool,
                    base_mint,
                    creator,
                    quote_mint,
                    config_key,
                    name,
                    symbol,
                } => {
                    let accepted = client
                        .notify_pool_created(&PoolCreatedPayload {
                            pool_address: pool,
                            base_mint,
                            quote_mint,
                            config_key,
                            creator,
                            name,
                            symbol,
                        })
                        .await;
                    println!("{}", if accepted { "✅ Registered" } else { "❌ Not registered" });
                }
            }
        }
    }

    Ok(())
}
