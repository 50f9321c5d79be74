use crate::core::store::DEFAULT_NAMESPACE;
use crate::utils::error::{EstateError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_CONFIG_FILE: &str = "estate-desk.toml";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_TERM_YEARS: u32 = 30;
pub const DEFAULT_RATE_PERCENT: f64 = 6.0;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: Option<StorageConfig>,
    pub calculator: Option<CalculatorConfig>,
    pub catalog: Option<CatalogConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorConfig {
    pub default_term_years: Option<u32>,
    pub default_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EstateError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 指定路徑時必須存在；未指定時嘗試預設檔名，沒有就使用預設值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("storage.data_dir", self.data_dir())?;
        validate_non_empty_string("storage.namespace", self.namespace())?;
        validate_positive_number("calculator.default_term_years", self.default_term_years(), 1)?;
        validate_range(
            "calculator.default_rate_percent",
            self.default_rate_percent(),
            0.0,
            100.0,
        )?;
        if let Some(path) = self.catalog_path() {
            validate_path("catalog.path", path)?;
        }
        Ok(())
    }

    pub fn data_dir(&self) -> &str {
        self.storage
            .as_ref()
            .and_then(|s| s.data_dir.as_deref())
            .unwrap_or(DEFAULT_DATA_DIR)
    }

    pub fn namespace(&self) -> &str {
        self.storage
            .as_ref()
            .and_then(|s| s.namespace.as_deref())
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn default_term_years(&self) -> u32 {
        self.calculator
            .as_ref()
            .and_then(|c| c.default_term_years)
            .unwrap_or(DEFAULT_TERM_YEARS)
    }

    pub fn default_rate_percent(&self) -> f64 {
        self.calculator
            .as_ref()
            .and_then(|c| c.default_rate_percent)
            .unwrap_or(DEFAULT_RATE_PERCENT)
    }

    pub fn catalog_path(&self) -> Option<&str> {
        self.catalog.as_ref().and_then(|c| c.path.as_deref())
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn set_data_dir(&mut self, data_dir: String) {
        self.storage.get_or_insert_with(Default::default).data_dir = Some(data_dir);
    }

    pub fn set_catalog_path(&mut self, path: String) {
        self.catalog.get_or_insert_with(Default::default).path = Some(path);
    }

    pub fn set_logging(&mut self, verbose: bool, json: bool) {
        let logging = self.logging.get_or_insert_with(Default::default);
        if verbose {
            logging.verbose = Some(true);
        }
        if json {
            logging.json = Some(true);
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.data_dir(), DEFAULT_DATA_DIR);
        assert_eq!(config.namespace(), "savedProperties");
        assert_eq!(config.default_term_years(), 30);
        assert_eq!(config.default_rate_percent(), 6.0);
        assert!(config.catalog_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
data_dir = "/var/lib/estate-desk"
namespace = "favorites"

[calculator]
default_term_years = 15
default_rate_percent = 4.25

[catalog]
path = "catalog.csv"

[logging]
verbose = true
json = true
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.data_dir(), "/var/lib/estate-desk");
        assert_eq!(config.namespace(), "favorites");
        assert_eq!(config.default_term_years(), 15);
        assert_eq!(config.default_rate_percent(), 4.25);
        assert_eq!(config.catalog_path(), Some("catalog.csv"));
        assert!(config.verbose());
        assert!(config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ESTATE_DESK_TEST_DATA_DIR", "/tmp/estate-test");

        let toml_content = r#"
[storage]
data_dir = "${ESTATE_DESK_TEST_DATA_DIR}"
namespace = "${ESTATE_DESK_TEST_UNSET_VAR}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/tmp/estate-test");
        assert_eq!(config.namespace(), "${ESTATE_DESK_TEST_UNSET_VAR}");

        std::env::remove_var("ESTATE_DESK_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[calculator]
default_term_years = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[calculator]
default_rate_percent = 250.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[storage\ndata_dir = 1").unwrap_err();
        assert!(matches!(err, EstateError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_dir = \"./file-test\"\n")
            .unwrap();

        let config = AppConfig::load(Some(temp_file.path())).unwrap();
        assert_eq!(config.data_dir(), "./file-test");
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.set_data_dir("/srv/data".to_string());
        config.set_catalog_path("listings.csv".to_string());
        config.set_logging(true, false);

        assert_eq!(config.data_dir(), "/srv/data");
        assert_eq!(config.catalog_path(), Some("listings.csv"));
        assert!(config.verbose());
        assert!(!config.json_logs());
    }
}
