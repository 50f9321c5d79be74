use crate::core::{KeyValueStore, VisitStats};
use crate::utils::error::{EstateError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::{DateTime, SecondsFormat, Utc};

const FIRST_VISIT_PREFIX: &str = "firstVisit";
const LAST_VISIT_PREFIX: &str = "lastVisit";
const MILLIS_PER_DAY: i64 = 86_400_000;

/// 記錄使用者的首次與最近造訪時間，提供「活躍天數」與「上次造訪」顯示。
pub struct VisitTracker<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> VisitTracker<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn record_visit(&self, user_id: &str, now: DateTime<Utc>) -> Result<VisitStats> {
        validate_non_empty_string("user_id", user_id)?;
        let first_key = format!("{}_{}", FIRST_VISIT_PREFIX, user_id);
        let last_key = format!("{}_{}", LAST_VISIT_PREFIX, user_id);

        let stored_first = self.read_timestamp(&first_key).await?;
        let previous_visit = self.read_timestamp(&last_key).await?.unwrap_or(now);
        let first_visit = stored_first.unwrap_or(now);

        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        // 首次造訪先寫；失敗時不留下只有 lastVisit 的狀態
        if stored_first.is_none() {
            self.write(&first_key, &stamp).await?;
        }
        self.write(&last_key, &stamp).await?;

        let stats = VisitStats {
            first_visit,
            previous_visit,
            days_active: days_between(first_visit, now),
            last_visit_label: relative_day_label(previous_visit, now),
        };
        tracing::debug!(user_id, days_active = stats.days_active, "Recorded visit");
        Ok(stats)
    }

    /// 無法解析的時間戳記視為不存在
    async fn read_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let raw = match self.storage.get(key).await {
            Ok(raw) => raw,
            Err(EstateError::CorruptValue { reason, .. }) => {
                tracing::warn!(key, "Ignoring unreadable timestamp: {}", reason);
                return Ok(None);
            }
            Err(e) => return Err(e.into_persistence(key)),
        };

        Ok(raw.and_then(|value| match DateTime::parse_from_rfc3339(&value) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(key, "Ignoring unreadable timestamp '{}': {}", value, e);
                None
            }
        }))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set(key, value)
            .await
            .map_err(|e| e.into_persistence(key))
    }
}

/// 兩個時間點之間經過的天數，向下取整 (`from` 在未來時為負)
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// 「Today」、「Yesterday」或「N days ago」
pub fn relative_day_label(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match days_between(now, date) {
        0 => "Today".to_string(),
        -1 => "Yesterday".to_string(),
        1 => "tomorrow".to_string(),
        d if d < 0 => format!("{} days ago", -d),
        d => format!("in {} days", d),
    }
}
