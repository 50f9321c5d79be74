use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use estate_desk::config::{Command, SavedAction};
use estate_desk::utils::error::ErrorSeverity;
use estate_desk::utils::format::{format_currency, format_whole_currency};
use estate_desk::utils::{logger, validation::Validate};
use estate_desk::{
    compute_monthly_payment, AppConfig, Catalog, Cli, EstateError, FileStore, Listing,
    ListingStore, LoanInput, VisitTracker,
};
use serde::Serialize;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref().map(Path::new)).with_context(|| {
        format!(
            "failed to load configuration from '{}'",
            cli.config.as_deref().unwrap_or("estate-desk.toml")
        )
    })?;
    cli.apply_overrides(&mut config);

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.verbose());
    } else {
        logger::init_cli_logger(config.verbose());
    }
    tracing::debug!("CLI args: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &Cli, config: &AppConfig) -> Result<(), EstateError> {
    let store = ListingStore::with_namespace(FileStore::new(config.data_dir()), config.namespace());

    match &cli.command {
        Command::Mortgage {
            price,
            down,
            rate,
            years,
        } => {
            let input = LoanInput::new(
                *price,
                *down,
                rate.unwrap_or_else(|| config.default_rate_percent()),
                years.unwrap_or_else(|| config.default_term_years()),
            );
            let result = compute_monthly_payment(&input)?;

            if cli.json {
                return print_json(&result);
            }
            println!("💰 Monthly payment: {}", format_currency(result.monthly_payment));
            println!(
                "   Loan: {} over {} payments at {:.3}% per month",
                format_currency(result.principal),
                result.number_of_payments,
                result.monthly_rate * 100.0
            );
            println!("   Down payment: {}", format_currency(result.down_payment));
            println!("   Total paid: {}", format_currency(result.total_paid()));
            println!("   Total interest: {}", format_currency(result.total_interest()));
        }
        Command::Saved { action } => {
            let listings = match action {
                SavedAction::List => store.list(&cli.user).await?,
                SavedAction::Add { id } => {
                    let catalog = load_catalog(config)?;
                    store.add_from_catalog(&cli.user, &catalog, id).await?
                }
                SavedAction::Remove { id } => store.remove(&cli.user, id).await?,
            };

            if cli.json {
                return print_json(&listings);
            }
            print_listings(&format!("⭐ {} saved listing(s)", listings.len()), &listings);
        }
        Command::Catalog => {
            let catalog = load_catalog(config)?;
            let available = store.available(&cli.user, &catalog).await?;

            if cli.json {
                return print_json(&available);
            }
            print_listings(
                &format!("📚 {} of {} listing(s) available", available.len(), catalog.len()),
                &available,
            );
        }
        Command::Histogram => {
            let histogram = store.price_histogram(&cli.user).await?;

            if cli.json {
                return print_json(&histogram);
            }
            println!("📊 Saved listings by price range ({} total)", histogram.total());
            for band in &histogram.bands {
                println!("   {:<8} {:>3} {}", band.label, band.count, "█".repeat(band.count));
            }
        }
        Command::Visit => {
            let tracker = VisitTracker::new(FileStore::new(config.data_dir()));
            let stats = tracker.record_visit(&cli.user, Utc::now()).await?;

            if cli.json {
                return print_json(&stats);
            }
            println!("👋 Days active: {}", stats.days_active);
            println!("   Last visit: {}", stats.last_visit_label);
        }
    }

    Ok(())
}

fn load_catalog(config: &AppConfig) -> Result<Catalog, EstateError> {
    match config.catalog_path() {
        Some(path) => Catalog::from_csv_path(path),
        None => Ok(Catalog::sample()),
    }
}

fn print_listings(heading: &str, listings: &[Listing]) {
    println!("{}", heading);
    for listing in listings {
        println!(
            "   [{}] {} ({}) {}",
            listing.id,
            listing.title,
            listing.location,
            format_whole_currency(listing.price)
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), EstateError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
