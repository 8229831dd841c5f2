use crate::core::DEFAULT_STORE_FILE_NAME;
use crate::identity::IdPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Anchor store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the store file
    pub directory: PathBuf,
    /// Store file name inside `directory`
    pub file_name: String,
    /// Pretty-print the persisted JSON array
    pub pretty: bool,
    /// fsync the temporary file before it replaces the store
    pub durable_writes: bool,
    /// Create `directory` on first write if it does not exist
    pub create_parent_dirs: bool,
    /// How sessions seed their id counter
    pub id_policy: IdPolicy,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value:?}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },

    #[error("failed to access config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize config: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of [`StoreConfig::validate`]
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: DEFAULT_STORE_FILE_NAME.to_string(),
            pretty: false,
            durable_writes: true,
            create_parent_dirs: true,
            id_policy: IdPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at `directory`
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_durable_writes(mut self, durable: bool) -> Self {
        self.durable_writes = durable;
        self
    }

    pub fn with_create_parent_dirs(mut self, create: bool) -> Self {
        self.create_parent_dirs = create;
        self
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    /// Full path of the store file
    pub fn store_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: StoreConfig = serde_json::from_str(&content)?;

        let validation = config.validate();
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the configuration for values the store cannot work with
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.file_name.trim().is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "file_name".to_string(),
                value: self.file_name.clone(),
                reason: "File name cannot be empty".to_string(),
            });
        } else if self.file_name == "." || self.file_name == ".." {
            errors.push(ConfigError::InvalidParameter {
                parameter: "file_name".to_string(),
                value: self.file_name.clone(),
                reason: "File name must name a file".to_string(),
            });
        } else if self.file_name.contains(['/', '\\']) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "file_name".to_string(),
                value: self.file_name.clone(),
                reason: "File name cannot contain path separators; use directory".to_string(),
            });
        }

        if self.directory.as_os_str().is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "directory".to_string(),
                value: String::new(),
                reason: "Directory cannot be empty; use \".\" for the working directory".to_string(),
            });
        }

        if !self.durable_writes {
            warnings.push("Writes are not synced to disk; a power loss may drop recent anchors".to_string());
        }
        if self.id_policy == IdPolicy::ProcessScoped {
            warnings.push("Process-scoped ids may collide with ids already persisted".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
