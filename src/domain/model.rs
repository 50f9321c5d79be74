use crate::domain::price;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 使用者收藏的物件。建立後不會就地修改，只會被加入或移除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub location: String,
    /// 以整數貨幣單位儲存。讀取時也接受 `"$4,500,000"` 這種顯示字串。
    #[serde(deserialize_with = "price::deserialize_price")]
    pub price: u64,
    #[serde(alias = "img")]
    pub image_ref: String,
}

impl Listing {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        price: u64,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location: location.into(),
            price,
            image_ref: image_ref.into(),
        }
    }
}

impl Validate for Listing {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("listing.id", &self.id)?;
        validate_non_empty_string("listing.title", &self.title)?;
        validate_non_empty_string("listing.location", &self.location)?;
        Ok(())
    }
}

/// 單一使用者的收藏，依加入順序排列
pub type UserListingCollection = Vec<Listing>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub home_price: f64,
    pub down_payment: f64,
    pub annual_interest_rate_percent: f64,
    pub term_years: u32,
}

impl LoanInput {
    pub fn new(
        home_price: f64,
        down_payment: f64,
        annual_interest_rate_percent: f64,
        term_years: u32,
    ) -> Self {
        Self {
            home_price,
            down_payment,
            annual_interest_rate_percent,
            term_years,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPaymentResult {
    pub monthly_payment: f64,
    pub principal: f64,
    pub down_payment: f64,
    pub monthly_rate: f64,
    pub number_of_payments: u32,
}

impl MonthlyPaymentResult {
    pub fn total_paid(&self) -> f64 {
        self.monthly_payment * f64::from(self.number_of_payments)
    }

    pub fn total_interest(&self) -> f64 {
        self.total_paid() - self.principal
    }

    /// 圓餅圖使用的 (貸款本金, 頭期款)
    pub fn chart_split(&self) -> (f64, f64) {
        (self.principal, self.down_payment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBand {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceHistogram {
    pub bands: [PriceBand; 4],
}

impl PriceHistogram {
    pub fn counts(&self) -> [usize; 4] {
        self.bands.map(|band| band.count)
    }

    pub fn total(&self) -> usize {
        self.bands.iter().map(|band| band.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitStats {
    pub first_visit: DateTime<Utc>,
    pub previous_visit: DateTime<Utc>,
    pub days_active: i64,
    pub last_visit_label: String,
}
