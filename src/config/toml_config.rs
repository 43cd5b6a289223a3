use crate::core::university::DEFAULT_DATA_FILE;
use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_UNIVERSITY_NAME: &str = "Tech University";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub university: UniversityConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversityConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub data_file: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl Default for UniversityConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_UNIVERSITY_NAME.to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

impl RegistryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegistryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RegistryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Full path of the registry file.
    pub fn data_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join(&self.storage.data_file)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl Validate for RegistryConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("university.name", &self.university.name)?;
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_path("storage.data_file", &self.storage.data_file)?;
        validation::validate_file_extension("storage.data_file", &self.storage.data_file, &["json"])?;
        if let Some(level) = self.log_level() {
            validation::validate_log_level("logging.level", level)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[university]
name = "DRAHO"

[storage]
data_dir = "./data"
data_file = "registry.json"

[logging]
level = "debug"
json = true
"#;

        let config = RegistryConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.university.name, "DRAHO");
        assert_eq!(config.data_path(), Path::new("./data").join("registry.json"));
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RegistryConfig::from_toml_str("").unwrap();

        assert_eq!(config.university.name, DEFAULT_UNIVERSITY_NAME);
        assert_eq!(config.storage.data_file, DEFAULT_DATA_FILE);
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("UNI_REGISTRY_TEST_DIR", "/tmp/uni");

        let toml_content = r#"
[storage]
data_dir = "${UNI_REGISTRY_TEST_DIR}"
data_file = "university_data.json"
"#;

        let config = RegistryConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.data_dir, "/tmp/uni");

        std::env::remove_var("UNI_REGISTRY_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[storage]
data_dir = "."
data_file = "university_data.csv"
"#;

        let config = RegistryConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[university]\nname = \"From File\"").unwrap();

        let config = RegistryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.university.name, "From File");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = RegistryConfig::from_toml_str("[university\nname = 1").unwrap_err();
        assert!(matches!(err, RegistryError::TomlError(_)));
    }
}
