//! # Configuration Management
//!
//! This module handles loading and managing application configuration from
//! multiple sources:
//! - TOML configuration files (config.toml)
//! - Environment variables (with APP_ prefix)
//! - Default values (built into the code)
//!
//! ## Configuration Priority (highest to lowest):
//! 1. Environment variables (APP_SERVER__HOST, APP_DATABASE__URL, etc.)
//! 2. Configuration file (config.toml)
//! 3. Default values (defined in the Default impl)
//!
//! The audio section describes the fixed PCM format the device firmware
//! sends (mono, 16-bit, 16 kHz). It is configurable here so a firmware
//! change doesn't require a rebuild, but it is not negotiated per request.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Main application configuration that contains all settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub audio: AudioConfig,
    pub database: DatabaseConfig,
}

/// Server-specific configuration settings.
///
/// ## Common values:
/// - `host = "127.0.0.1"`: Only accept connections from localhost (development)
/// - `host = "0.0.0.0"`: Accept connections from the device network (production)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where audio artifacts land on disk.
///
/// The directory is created on demand; `.raw` files in it are transient,
/// `.wav` files are retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub audio_dir: String,
}

/// PCM format of inbound recordings.
///
/// ## Fields:
/// - `channels`: Number of interleaved channels (1 = mono, the M5StickC sends mono)
/// - `sample_rate`: Samples per second per channel (device records at 16000 Hz)
/// - `bits_per_sample`: Bit depth of each sample (16 = signed little-endian)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// Items database connection settings.
///
/// ## Fields:
/// - `url`: sqlx connection string (e.g. "sqlite://sensor_hub.db?mode=rwc")
/// - `max_connections`: Upper bound on pooled connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl AudioConfig {
    /// Bytes per sample, derived from the bit depth.
    pub fn sample_width(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per complete frame (one sample per channel).
    pub fn frame_size(&self) -> usize {
        self.channels as usize * self.sample_width() as usize
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 10000,
            },
            storage: StorageConfig {
                audio_dir: "audio_files".to_string(),
            },
            audio: AudioConfig {
                channels: 1,
                sample_rate: 16000, // matches the M5StickC Plus firmware
                bits_per_sample: 16,
            },
            database: DatabaseConfig {
                url: "sqlite://sensor_hub.db?mode=rwc".to_string(),
                max_connections: 5,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources in priority order.
    ///
    /// ## Configuration Loading Process:
    /// 1. Start with built-in defaults
    /// 2. Override with values from config.toml (if it exists)
    /// 3. Override with environment variables prefixed with APP_
    /// 4. Handle special cases for HOST and PORT environment variables
    ///
    /// ## Environment Variable Examples:
    /// - `APP_SERVER__HOST=0.0.0.0`: Override server host
    /// - `APP_STORAGE__AUDIO_DIR=/var/lib/sensor-hub/audio`: Override audio directory
    /// - `APP_DATABASE__URL=sqlite:///data/items.db`: Override database url
    /// - `HOST` / `PORT`: Special cases for deployment platforms
    ///
    /// The key separator is `__` so multi-word field names like
    /// `audio_dir` and `max_connections` stay addressable.
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        // Deployment platforms commonly inject these without the APP_ prefix
        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate that the configuration values make sense.
    ///
    /// ## What this checks:
    /// - Server port is not 0 (port 0 is reserved)
    /// - Audio directory is not empty
    /// - Channel count and sample rate are non-zero
    /// - Bit depth is 16 (the only depth the container framer decodes)
    /// - Database pool allows at least one connection
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.storage.audio_dir.is_empty() {
            return Err(anyhow::anyhow!("Audio directory cannot be empty"));
        }

        if self.audio.channels == 0 {
            return Err(anyhow::anyhow!("Channel count must be greater than 0"));
        }

        if self.audio.sample_rate == 0 {
            return Err(anyhow::anyhow!("Sample rate must be greater than 0"));
        }

        if self.audio.bits_per_sample != 16 {
            return Err(anyhow::anyhow!(
                "Bits per sample must be 16 (only 16-bit PCM is handled)"
            ));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("Max connections must be greater than 0"));
        }

        Ok(())
    }

    /// Update configuration from a JSON string (used for runtime config updates).
    ///
    /// ## Partial updates:
    /// Only the fields present in the JSON are changed. For example,
    /// `{"server": {"port": 9000}}` changes only the port. The database
    /// section is deliberately not updatable at runtime; the pool is built
    /// once at startup.
    pub fn update_from_json(&mut self, json_str: &str) -> Result<()> {
        let partial_config: serde_json::Value = serde_json::from_str(json_str)?;

        if let Some(server) = partial_config.get("server") {
            if let Some(host) = server.get("host").and_then(|v| v.as_str()) {
                self.server.host = host.to_string();
            }
            if let Some(port) = server.get("port").and_then(|v| v.as_u64()) {
                self.server.port = port as u16;
            }
        }

        if let Some(storage) = partial_config.get("storage") {
            if let Some(dir) = storage.get("audio_dir").and_then(|v| v.as_str()) {
                self.storage.audio_dir = dir.to_string();
            }
        }

        if let Some(audio) = partial_config.get("audio") {
            if let Some(channels) = audio.get("channels").and_then(|v| v.as_u64()) {
                self.audio.channels = channels as u16;
            }
            if let Some(rate) = audio.get("sample_rate").and_then(|v| v.as_u64()) {
                self.audio.sample_rate = rate as u32;
            }
            if let Some(bits) = audio.get("bits_per_sample").and_then(|v| v.as_u64()) {
                self.audio.bits_per_sample = bits as u16;
            }
        }

        self.validate()?;
        Ok(())
    }
}
