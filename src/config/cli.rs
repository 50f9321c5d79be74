use crate::config::toml_config::AppConfig;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "estate-desk")]
#[command(about = "Saved listings, price histograms and mortgage payments")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory where saved listings are stored (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Catalog CSV to use instead of the built-in sample
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// User whose saved listings are read and written
    #[arg(short, long, global = true, default_value = "local")]
    pub user: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute the monthly payment of a fixed-rate mortgage
    Mortgage {
        /// Home price
        #[arg(long)]
        price: f64,

        /// Down payment
        #[arg(long, default_value_t = 0.0)]
        down: f64,

        /// Annual interest rate in percent (defaults to config)
        #[arg(long)]
        rate: Option<f64>,

        /// Loan term in years (defaults to config)
        #[arg(long)]
        years: Option<u32>,
    },

    /// Manage saved listings
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Show catalog listings the user has not saved yet
    Catalog,

    /// Count saved listings per price range
    Histogram,

    /// Record a visit and show activity stats
    Visit,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SavedAction {
    /// List saved listings in the order they were added
    List,
    /// Save a listing from the catalog
    Add { id: String },
    /// Remove a saved listing
    Remove { id: String },
}

impl Cli {
    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(data_dir) = &self.data_dir {
            config.set_data_dir(data_dir.clone());
        }
        if let Some(catalog) = &self.catalog {
            config.set_catalog_path(catalog.clone());
        }
        config.set_logging(self.verbose, self.log_json);
    }
}
