use crate::core::catalog::Catalog;
use crate::core::{KeyValueStore, Listing, PriceHistogram, UserListingCollection};
use crate::utils::error::{DeserializationWarning, EstateError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use std::collections::HashSet;

pub const DEFAULT_NAMESPACE: &str = "savedProperties";

/// 每位使用者的收藏清單，存放在 `{namespace}_{user_id}` 鍵下的 JSON 陣列。
///
/// 每個操作都是「讀取、修改、寫回」，假設同一使用者只有一個寫入者。
pub struct ListingStore<S: KeyValueStore> {
    storage: S,
    namespace: String,
}

impl<S: KeyValueStore> ListingStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_namespace(storage, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    pub fn storage_key(&self, user_id: &str) -> String {
        format!("{}_{}", self.namespace, user_id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 讀取收藏。資料不存在或無法解析時回傳空清單，不視為錯誤。
    pub async fn list(&self, user_id: &str) -> Result<UserListingCollection> {
        let key = self.key_for(user_id)?;
        self.load(&key).await
    }

    /// 加入收藏；相同 id 已存在時不做任何事
    pub async fn add(&self, user_id: &str, listing: Listing) -> Result<UserListingCollection> {
        let key = self.key_for(user_id)?;
        listing.validate()?;

        let mut listings = self.load(&key).await?;
        if listings.iter().any(|saved| saved.id == listing.id) {
            tracing::debug!(user_id, listing_id = %listing.id, "Listing already saved, skipping");
            return Ok(listings);
        }

        tracing::info!(user_id, listing_id = %listing.id, "Saving listing");
        listings.push(listing);
        self.persist(&key, &listings).await?;
        Ok(listings)
    }

    /// 移除收藏；id 不存在時不做任何事
    pub async fn remove(&self, user_id: &str, listing_id: &str) -> Result<UserListingCollection> {
        let key = self.key_for(user_id)?;

        let mut listings = self.load(&key).await?;
        let before = listings.len();
        listings.retain(|saved| saved.id != listing_id);
        if listings.len() == before {
            tracing::debug!(user_id, listing_id, "Listing not saved, nothing to remove");
            return Ok(listings);
        }

        tracing::info!(user_id, listing_id, "Removing listing");
        self.persist(&key, &listings).await?;
        Ok(listings)
    }

    pub async fn price_histogram(&self, user_id: &str) -> Result<PriceHistogram> {
        let listings = self.list(user_id).await?;
        Ok(PriceHistogram::from_listings(&listings))
    }

    /// 目錄中使用者尚未收藏的物件，保持目錄順序
    pub async fn available(&self, user_id: &str, catalog: &Catalog) -> Result<Vec<Listing>> {
        let saved = self.list(user_id).await?;
        let saved_ids: HashSet<&str> = saved.iter().map(|listing| listing.id.as_str()).collect();

        Ok(catalog
            .listings()
            .iter()
            .filter(|listing| !saved_ids.contains(listing.id.as_str()))
            .cloned()
            .collect())
    }

    pub async fn add_from_catalog(
        &self,
        user_id: &str,
        catalog: &Catalog,
        listing_id: &str,
    ) -> Result<UserListingCollection> {
        let listing = catalog.get(listing_id).cloned().ok_or_else(|| {
            EstateError::invalid_input(
                "listing_id",
                format!("'{}' is not in the catalog", listing_id),
            )
        })?;
        self.add(user_id, listing).await
    }

    fn key_for(&self, user_id: &str) -> Result<String> {
        validate_non_empty_string("user_id", user_id)?;
        Ok(self.storage_key(user_id))
    }

    async fn load(&self, key: &str) -> Result<UserListingCollection> {
        let decoded = match self.storage.get(key).await {
            Ok(Some(raw)) => decode_collection(key, &raw),
            Ok(None) => {
                tracing::debug!(key, "No saved listings yet");
                return Ok(Vec::new());
            }
            Err(EstateError::CorruptValue { key, reason }) => {
                Err(DeserializationWarning { key, reason })
            }
            Err(e) => return Err(e.into_persistence(key)),
        };

        match decoded {
            Ok(listings) => Ok(listings),
            Err(warning) => {
                tracing::warn!(key = %warning.key, reason = %warning.reason, "⚠️ {}", warning);
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, key: &str, listings: &[Listing]) -> Result<()> {
        let encoded = serde_json::to_string(listings)?;
        tracing::debug!(key, count = listings.len(), bytes = encoded.len(), "Persisting listings");
        self.storage
            .set(key, &encoded)
            .await
            .map_err(|e| e.into_persistence(key))
    }
}

/// 解析並驗證儲存的收藏。格式錯誤、欄位為空或 id 重複都視為無法讀取。
pub fn decode_collection(
    key: &str,
    raw: &str,
) -> std::result::Result<UserListingCollection, DeserializationWarning> {
    let warning = |reason: String| DeserializationWarning {
        key: key.to_string(),
        reason,
    };

    let listings: UserListingCollection =
        serde_json::from_str(raw).map_err(|e| warning(e.to_string()))?;

    let mut seen = HashSet::new();
    for listing in &listings {
        listing.validate().map_err(|e| warning(e.to_string()))?;
        if !seen.insert(listing.id.as_str()) {
            return Err(warning(format!("duplicate listing id '{}'", listing.id)));
        }
    }

    Ok(listings)
}
