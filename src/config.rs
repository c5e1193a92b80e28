use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::bufed::sort::{SharedSortOrder, SortKey, SortMask};

/// Narrowest name column that still fits a head, the ellipsis and a tail
pub const MIN_NAME_COLUMN_WIDTH: usize = 9;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Buffer list behavior (column widths, initial filter and sort)
    #[serde(default)]
    pub buffer_list: BufferListConfig,

    /// Custom keybindings for the buffer list (override the defaults)
    #[serde(default)]
    pub keybindings: Vec<Keybinding>,
}

/// Buffer list configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BufferListConfig {
    /// Width of the buffer name column; longer names are shortened with "..."
    #[serde(default = "default_name_column_width")]
    pub name_column_width: usize,

    /// Show system buffers when the list is opened without a prefix argument
    #[serde(default = "default_false")]
    pub show_system_buffers: bool,

    /// Sort order used until the user picks one
    #[serde(default)]
    pub initial_sort: SortKey,

    /// Start with the initial sort order reversed
    #[serde(default = "default_false")]
    pub initial_descending: bool,

    /// Preview the buffer under the cursor while moving in the popup list
    #[serde(default = "default_true")]
    pub preview_on_move: bool,
}

fn default_name_column_width() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for BufferListConfig {
    fn default() -> Self {
        Self {
            name_column_width: default_name_column_width(),
            show_system_buffers: false,
            initial_sort: SortKey::Unsorted,
            initial_descending: false,
            preview_on_move: true,
        }
    }
}

impl BufferListConfig {
    /// Sort mask the shared sort order starts with
    pub fn initial_sort_mask(&self) -> SortMask {
        let mask = self.initial_sort.mask();
        if self.initial_descending {
            mask.descending()
        } else {
            mask
        }
    }

    /// A fresh process-wide sort order seeded from this configuration
    pub fn shared_sort_order(&self) -> SharedSortOrder {
        SharedSortOrder::new(self.initial_sort_mask())
    }
}

/// Keybinding definition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Keybinding {
    /// Key name (e.g., "a", "Enter", "F1")
    pub key: String,

    /// Modifiers (e.g., ["ctrl"], ["ctrl", "shift"])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,

    /// Action to perform (e.g., "bufed-sort-size", "bufed-kill-buffer")
    pub action: String,

    /// Optional arguments for the action (e.g., {"direction": "descending"})
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, serde_json::Value>,
}

impl Config {
    /// Get the default config file path
    pub fn default_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("bufed").join("config.json"))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if given, else from the default location if it
    /// exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_config_path() {
                Some(default) if default.exists() => Self::load_from_file(default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = self.to_json_pretty()?;
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// JSON schema of the configuration file
    pub fn json_schema() -> Result<String, ConfigError> {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_list.name_column_width < MIN_NAME_COLUMN_WIDTH {
            return Err(ConfigError::ValidationError(format!(
                "buffer_list.name_column_width must be at least {MIN_NAME_COLUMN_WIDTH}, got {}",
                self.buffer_list.name_column_width
            )));
        }

        for binding in &self.keybindings {
            if binding.action.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "keybinding for key '{}' has no action",
                    binding.key
                )));
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
