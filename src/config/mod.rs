//! Configuration module for newsdesk
//!
//! A run is described by a [`PipelineConfig`]: the producers (id, message
//! count, private queue capacity), one capacity shared by the category and
//! screen queues, and a few runtime [`PipelineSettings`].
//!
//! # Formats
//!
//! - **TOML** (`*.toml`), deserialized with serde:
//!
//! ```toml
//! co_editor_queue_size = 17
//!
//! [[producers]]
//! id = 1
//! messages = 30
//! queue_size = 5
//!
//! [settings]
//! edit_delay_ms = 100
//! seed = 42
//! ```
//!
//! - **Text descriptor** (any other extension), see [`parser`].
//!
//! # Example
//!
//! ```ignore
//! use newsdesk::config::PipelineConfig;
//!
//! let config = PipelineConfig::load("config.txt")?;
//! println!("{} producers", config.producers.len());
//! ```

pub mod parser;

pub use parser::parse_descriptor;

use crate::error::{NewsdeskError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Default artificial editing delay per article, in milliseconds
pub const DEFAULT_EDIT_DELAY_MS: u64 = 100;

/// File extension selecting the TOML format
pub const TOML_EXTENSION: &str = "toml";

/// One producer thread's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerSpec {
    /// Identity embedded in every article this producer emits
    pub id: u32,
    /// Number of articles to emit before the sentinel
    pub messages: usize,
    /// Capacity of the producer's private buffer
    pub queue_size: usize,
}

/// Runtime knobs that do not change the pipeline shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Delay each co-editor spends on an article
    pub edit_delay_ms: u64,
    /// Base seed for producer category choice; random when unset
    pub seed: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            edit_delay_ms: DEFAULT_EDIT_DELAY_MS,
            seed: None,
        }
    }
}

impl PipelineSettings {
    pub fn edit_delay(&self) -> Duration {
        Duration::from_millis(self.edit_delay_ms)
    }
}

/// Complete description of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Producers, in dispatcher scan order
    #[serde(default)]
    pub producers: Vec<ProducerSpec>,

    /// Capacity of each category queue and of the screen queue
    pub co_editor_queue_size: usize,

    #[serde(default)]
    pub settings: PipelineSettings,
}

impl PipelineConfig {
    /// Create a config with default settings
    pub fn new(producers: Vec<ProducerSpec>, co_editor_queue_size: usize) -> Self {
        Self {
            producers,
            co_editor_queue_size,
            settings: PipelineSettings::default(),
        }
    }

    /// Replace the runtime settings
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load and validate a config file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TOML_EXTENSION));
        let config = if is_toml {
            Self::from_toml_str(&content)
        } else {
            parse_descriptor(&content)
        }
        .with_context(|| format!("Failed to parse config file {:?}", path))?;

        config.validate()?;
        tracing::info!(
            "Loaded {} producers from {:?} (co-editor queue size {})",
            config.producers.len(),
            path,
            config.co_editor_queue_size
        );
        Ok(config)
    }

    /// Parse the TOML form (not validated)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| NewsdeskError::Config(e.message().to_string()))
    }

    /// Serialize to the TOML form
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| NewsdeskError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every capacity is usable.
    ///
    /// Duplicate producer ids are allowed (ids only label articles) but
    /// logged, since their output lines become indistinguishable.
    pub fn validate(&self) -> Result<()> {
        if self.co_editor_queue_size == 0 {
            return Err(NewsdeskError::Config(
                "Co-Editor queue size must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.producers {
            if spec.queue_size == 0 {
                return Err(NewsdeskError::Config(format!(
                    "producer {} queue size must be at least 1",
                    spec.id
                )));
            }
            if !seen.insert(spec.id) {
                tracing::warn!("producer id {} appears more than once", spec.id);
            }
        }
        Ok(())
    }

    /// Total articles the producers will emit
    pub fn total_messages(&self) -> u64 {
        self.producers.iter().map(|p| p.messages as u64).sum()
    }
}
