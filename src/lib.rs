pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use adapters::{FileStore, MemoryStore};
pub use config::AppConfig;
pub use crate::core::{
    aggregate::bucket_prices, catalog::Catalog, finance::compute_monthly_payment,
    store::ListingStore, visits::VisitTracker,
};
pub use domain::model::{
    Listing, LoanInput, MonthlyPaymentResult, PriceBand, PriceHistogram, UserListingCollection,
    VisitStats,
};
pub use domain::ports::KeyValueStore;
pub use domain::price::parse_price;
pub use utils::error::{EstateError, Result};
