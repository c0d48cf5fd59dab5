use crate::{buffer::BufferEviction, redirect::FaceRetention};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "std")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct StrategyConfig {
    // Whether the node is the one closest to the mobile terminal.
    pub is_edge_node: bool,

    // Whether an edge node pushes redirected data out immediately.
    pub pass_through: bool,

    // Added to the redirect start time to get the oldest record a flush replays.
    pub retransmission_interval_ms: u64,

    // Lifetime of the PIT entries made up for redirected data.
    pub synthesized_interest_lifetime_ms: u64,

    // What happens to buffered records.
    pub buffer_eviction: BufferEviction,

    // What happens to redirect faces when a mode is switched off.
    pub face_retention: FaceRetention,

    pub tables: TablesConfig,
}

// Sizing of the reference collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct TablesConfig {
    pub pit_capacity: usize,
    pub pit_erased_retention_ms: u64,
    pub content_store_capacity: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            is_edge_node: false,
            pass_through: false,
            retransmission_interval_ms: DEFAULT_RETRANSMISSION_INTERVAL_MS,
            synthesized_interest_lifetime_ms: ONE_YEAR_MS,
            buffer_eviction: BufferEviction::Retain,
            face_retention: FaceRetention::Keep,
            tables: TablesConfig::default(),
        }
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            pit_capacity: 4096,
            pit_erased_retention_ms: 100,
            content_store_capacity: 1024,
        }
    }
}

impl StrategyConfig {
    // Configuration for an access point.
    pub fn edge(pass_through: bool) -> Self {
        Self {
            is_edge_node: true,
            pass_through,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.synthesized_interest_lifetime_ms == 0 {
            return Err(ConfigError::Invalid(
                "synthesized_interest_lifetime_ms must be positive",
            ));
        }
        if self.tables.pit_capacity == 0 {
            return Err(ConfigError::Invalid("tables.pit_capacity must be positive"));
        }
        if let BufferEviction::MaxAge { ms: 0 } = self.buffer_eviction {
            return Err(ConfigError::Invalid("buffer_eviction max_age must be positive"));
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl StrategyConfig {
    // Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    // Load configuration from a TOML file.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

const DEFAULT_RETRANSMISSION_INTERVAL_MS: u64 = 100;
pub(crate) const ONE_YEAR_MS: u64 = 365 * 24 * 60 * 60 * 1000;
