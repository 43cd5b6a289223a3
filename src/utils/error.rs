use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
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

impl RegistryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::IoError(_) => ErrorCategory::Storage,
            RegistryError::SerializationError(_) => ErrorCategory::Data,
            RegistryError::TomlError(_)
            | RegistryError::ConfigError { .. }
            | RegistryError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 針對錯誤類型提供修復建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RegistryError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Run `uni-registry demo` first or point --data-file at an existing registry file"
            }
            RegistryError::IoError(_) => "Check file permissions and available disk space",
            RegistryError::SerializationError(_) => {
                "The registry file is not a valid university document; restore it or save a new one"
            }
            RegistryError::TomlError(_) => "Fix the TOML syntax in the configuration file",
            RegistryError::ConfigError { .. } | RegistryError::InvalidConfigValueError { .. } => {
                "Review the configuration values and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RegistryError::IoError(e) => format!("Could not access the registry file: {}", e),
            RegistryError::SerializationError(e) => {
                format!("The registry file could not be read: {}", e)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
