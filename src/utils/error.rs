use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstateError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Persistence failure for key '{key}': {message}")]
    Persistence { key: String, message: String },

    /// 儲存層讀到了資料，但內容本身無法使用 (例如不是 UTF-8)
    #[error("Corrupt value under key '{key}': {reason}")]
    CorruptValue { key: String, reason: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// 儲存資料存在但無法解析時的診斷。不會回傳給呼叫端，只記錄在日誌中。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Discarded unreadable data under key '{key}': {reason}")]
pub struct DeserializationWarning {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EstateError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn persistence(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn corrupt_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// 儲存層回報的任何錯誤，對呼叫端而言都是持久化失敗。
    /// `CorruptValue` 保留原樣，讓呼叫端走警告並清空的路徑。
    pub fn into_persistence(self, key: &str) -> Self {
        match self {
            Self::Persistence { .. } | Self::CorruptValue { .. } => self,
            other => Self::persistence(key, other.to_string()),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::Persistence { .. } | Self::IoError(_) => ErrorCategory::Storage,
            Self::CorruptValue { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Data
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInput { .. } | Self::ValidationError { .. } => ErrorSeverity::High,
            // 寫入被拒絕通常是暫時性的 (配額、權限)，可以重試
            Self::Persistence { .. } => ErrorSeverity::Medium,
            Self::CorruptValue { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorSeverity::High
            }
            Self::IoError(_) | Self::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => {
                "Check the values you entered (down payment must not exceed the home price, term must be positive)"
            }
            Self::Persistence { .. } => {
                "Check that the data directory is writable and has free space, then retry"
            }
            Self::CorruptValue { .. } => {
                "The stored file is damaged; saving again will replace it"
            }
            Self::CsvError(_) => "Make sure the catalog CSV has the header id,title,location,price,image_ref",
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "The data could not be encoded; report this as a bug",
            Self::ConfigError { .. } => "Fix the configuration file and try again",
            Self::ValidationError { .. } => "Correct the offending records and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => format!("Invalid {}: {}", field, reason),
            Self::Persistence { message, .. } => {
                format!("Your saved properties could not be stored: {}", message)
            }
            Self::CorruptValue { reason, .. } => format!("Stored data is unreadable: {}", reason),
            Self::CsvError(e) => format!("Could not read the property catalog: {}", e),
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::SerializationError(e) => format!("Could not encode data: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ValidationError { message } => format!("Invalid data: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, EstateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_high_severity_input_error() {
        let err = EstateError::invalid_input("down_payment", "exceeds home price");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.to_string(),
            "Invalid input for down_payment: exceeds home price"
        );
    }

    #[test]
    fn test_persistence_error_is_retryable() {
        let err = EstateError::persistence("savedProperties_u1", "quota exceeded");
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("quota exceeded"));
    }

    #[test]
    fn test_into_persistence_keeps_corrupt_value() {
        let corrupt = EstateError::corrupt_value("savedProperties_u1", "invalid utf-8");
        assert!(matches!(
            corrupt.into_persistence("savedProperties_u1"),
            EstateError::CorruptValue { .. }
        ));

        let io = EstateError::from(std::io::Error::other("disk gone"));
        assert!(matches!(
            io.into_persistence("savedProperties_u1"),
            EstateError::Persistence { ref key, .. } if key == "savedProperties_u1"
        ));
    }
}
