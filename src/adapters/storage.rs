use crate::domain::ports::KeyValueStore;
use crate::utils::error::{EstateError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

/// 記憶體內的 KV 儲存，供測試與單次執行使用。
/// 可以注入讀寫失敗，模擬配額已滿、磁碟無法存取之類的情況。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    write_failure: Arc<StdMutex<Option<InjectedFailure>>>,
    read_failure: Arc<StdMutex<Option<InjectedFailure>>>,
}

/// `key` 為 None 時對所有鍵生效
#[derive(Debug, Clone)]
struct InjectedFailure {
    key: Option<String>,
    message: String,
}

impl InjectedFailure {
    fn applies_to(&self, key: &str) -> bool {
        self.key.as_deref().map_or(true, |target| target == key)
    }
}

fn set_failure(slot: &StdMutex<Option<InjectedFailure>>, failure: Option<InjectedFailure>) {
    if let Ok(mut current) = slot.lock() {
        *current = failure;
    }
}

fn failure_for(slot: &StdMutex<Option<InjectedFailure>>, key: &str) -> Option<String> {
    slot.lock().ok().and_then(|current| {
        current
            .as_ref()
            .filter(|failure| failure.applies_to(key))
            .map(|failure| failure.message.clone())
    })
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接放入原始值，不經過任何檢查
    pub async fn insert(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        entries.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub fn fail_writes(&self, message: &str) {
        set_failure(
            &self.write_failure,
            Some(InjectedFailure {
                key: None,
                message: message.to_string(),
            }),
        );
    }

    /// 只有寫入指定鍵時失敗
    pub fn fail_writes_to(&self, key: &str, message: &str) {
        set_failure(
            &self.write_failure,
            Some(InjectedFailure {
                key: Some(key.to_string()),
                message: message.to_string(),
            }),
        );
    }

    pub fn allow_writes(&self) {
        set_failure(&self.write_failure, None);
    }

    pub fn fail_reads(&self, message: &str) {
        set_failure(
            &self.read_failure,
            Some(InjectedFailure {
                key: None,
                message: message.to_string(),
            }),
        );
    }

    pub fn allow_reads(&self) {
        set_failure(&self.read_failure, None);
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(message) = failure_for(&self.read_failure, key) {
            return Err(EstateError::persistence(key, message));
        }
        Ok(self.raw(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(message) = failure_for(&self.write_failure, key) {
            return Err(EstateError::persistence(key, message));
        }
        self.insert(key, value).await;
        Ok(())
    }
}

/// 每個鍵存成資料目錄下的一個檔案
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(EstateError::invalid_input("key", "Storage key cannot be empty"));
        }
        Ok(self.base_path.join(encode_key(key)))
    }
}

/// 英數字、`_`、`-` 以外的位元組都轉成 `%XX`，避免路徑穿越與檔名衝突
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let full_path = self.path_for(key)?;
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(value) => Ok(Some(value)),
                Err(e) => Err(EstateError::corrupt_value(key, e.to_string())),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EstateError::persistence(key, e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let full_path = self.path_for(key)?;
        let temp_path = full_path.with_extension("tmp");

        let write = async {
            tokio::fs::create_dir_all(&self.base_path).await?;
            tokio::fs::write(&temp_path, value.as_bytes()).await?;
            // 先寫暫存檔再改名，讀取端不會看到寫到一半的內容
            tokio::fs::rename(&temp_path, &full_path).await?;
            Ok::<_, std::io::Error>(())
        };

        write.await.map_err(|e| {
            tracing::error!("❌ Failed to write {}: {}", full_path.display(), e);
            EstateError::persistence(key, e.to_string())
        })?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), full_path.display());
        Ok(())
    }
}
