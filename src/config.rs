//! Configuration for flatkv
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a flatkv store
#[derive(Debug, Clone, Copy)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Load Configuration
    // -------------------------------------------------------------------------
    /// How to treat corrupt directory rows when loading the backing file
    pub corruption_policy: CorruptionPolicy,

    // -------------------------------------------------------------------------
    // Save Configuration
    // -------------------------------------------------------------------------
    /// How the serialized image is written to the backing file
    pub write_strategy: WriteStrategy,
}

/// Policy for corrupt directory rows encountered during load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionPolicy {
    /// Register mis-sized fixed-width rows without a payload and skip rows
    /// that cannot be represented at all (unknown tag, empty key,
    /// out-of-bounds value range). The rest of the file still loads.
    Skip,

    /// Fail the whole load with `CorruptDirectory` on the first bad row
    Fail,
}

/// Strategy for persisting the serialized store image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Write to a temp file in the same directory, fsync, then rename over
    /// the target (safest: the old file survives a mid-write crash)
    AtomicRename,

    /// Truncate the target and write directly (a crash mid-write leaves a
    /// partial file)
    InPlace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corruption_policy: CorruptionPolicy::Skip,
            write_strategy: WriteStrategy::AtomicRename,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the corruption policy for load
    pub fn corruption_policy(mut self, policy: CorruptionPolicy) -> Self {
        self.config.corruption_policy = policy;
        self
    }

    /// Set the write strategy for save
    pub fn write_strategy(mut self, strategy: WriteStrategy) -> Self {
        self.config.write_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
