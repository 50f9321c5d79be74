use crate::core::{Listing, PriceBand, PriceHistogram};

pub const BAND_LABELS: [&str; 4] = ["$0-1M", "$1M-2M", "$2M-3M", "$3M+"];

const ONE_MILLION: u64 = 1_000_000;
const TWO_MILLION: u64 = 2_000_000;
const THREE_MILLION: u64 = 3_000_000;

/// 上界包含在各區間內，最後一個區間沒有上界
pub fn bucket_prices(prices: &[u64]) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for &price in prices {
        let band = match price {
            p if p <= ONE_MILLION => 0,
            p if p <= TWO_MILLION => 1,
            p if p <= THREE_MILLION => 2,
            _ => 3,
        };
        counts[band] += 1;
    }
    counts
}

impl PriceHistogram {
    pub fn from_prices(prices: &[u64]) -> Self {
        let counts = bucket_prices(prices);
        let bands = std::array::from_fn(|i| PriceBand {
            label: BAND_LABELS[i],
            count: counts[i],
        });
        Self { bands }
    }

    pub fn from_listings(listings: &[Listing]) -> Self {
        let prices: Vec<u64> = listings.iter().map(|listing| listing.price).collect();
        Self::from_prices(&prices)
    }
}
