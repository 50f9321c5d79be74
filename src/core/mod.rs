pub mod aggregate;
pub mod catalog;
pub mod finance;
pub mod store;
pub mod visits;

pub use crate::domain::model::{
    Listing, LoanInput, MonthlyPaymentResult, PriceBand, PriceHistogram, UserListingCollection,
    VisitStats,
};
pub use crate::domain::ports::KeyValueStore;
pub use crate::utils::error::Result;
