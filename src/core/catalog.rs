use crate::core::Listing;
use crate::utils::error::{EstateError, Result};
use crate::utils::validation::Validate;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// 可供使用者挑選收藏的物件目錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    listings: Vec<Listing>,
}

/// CSV 欄位：id,title,location,price,image_ref
#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    title: String,
    location: String,
    #[serde(deserialize_with = "crate::domain::price::deserialize_price")]
    price: u64,
    #[serde(alias = "img")]
    image_ref: String,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, listing) in listings.iter().enumerate() {
            listing.validate().map_err(|e| EstateError::ValidationError {
                message: format!("catalog entry {}: {}", index + 1, e),
            })?;
            if !seen.insert(listing.id.as_str()) {
                return Err(EstateError::ValidationError {
                    message: format!("duplicate catalog id '{}'", listing.id),
                });
            }
        }
        Ok(Self { listings })
    }

    /// 內建的示範目錄
    pub fn sample() -> Self {
        let unsplash = |photo: &str| {
            format!(
                "https://images.unsplash.com/{}?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&q=60",
                photo
            )
        };

        Self {
            listings: vec![
                Listing::new(
                    "prop1",
                    "Oceanview Villa",
                    "Malibu, California",
                    4_500_000,
                    unsplash("photo-1600585154340-be6161a56a0c"),
                ),
                Listing::new(
                    "prop2",
                    "Lakeside Retreat",
                    "Geneva, Switzerland",
                    3_200_000,
                    unsplash("photo-1580587771525-78b9dba3b914"),
                ),
                Listing::new(
                    "prop3",
                    "The Grand Suburban",
                    "Aspen, Colorado",
                    2_800_000,
                    unsplash("photo-1568605114967-8130f3a36994"),
                ),
                Listing::new(
                    "prop4",
                    "Modern City Loft",
                    "New York, USA",
                    1_950_000,
                    unsplash("photo-1522708323590-d24dbb6b0267"),
                ),
                Listing::new(
                    "prop5",
                    "Desert Oasis",
                    "Scottsdale, Arizona",
                    2_400_000,
                    unsplash("photo-1613490493576-7fde63acd811"),
                ),
            ],
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut listings = Vec::new();
        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;
            listings.push(Listing::new(
                row.id,
                row.title,
                row.location,
                row.price,
                row.image_ref,
            ));
        }

        tracing::debug!("Parsed {} catalog rows", listings.len());
        Self::new(listings)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        let catalog = Self::from_csv_reader(file)?;
        tracing::info!(
            "📚 Loaded {} listings from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::sample()
    }
}
