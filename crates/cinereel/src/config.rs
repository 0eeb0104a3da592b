//! Layered TOML configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Bundled defaults (`cinereel.toml` at the workspace root, compiled in)
//! 2. `~/.config/cinereel/cinereel.toml`
//! 3. `./cinereel.toml`
//! 4. `CINEREEL_*` environment variables, `__` separating section and key
//!    (`CINEREEL_VIDEO__POLL_TIMEOUT_SECS=900`)

use cinereel_core::{DEFAULT_LANGUAGE, SceneCount, VISUAL_STYLES};
use cinereel_error::{CinereelError, CinereelResult, ConfigError};
use cinereel_models::{GeminiConfig, PollConfig};
use cinereel_studio::{Draft, StudioSettings};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../cinereel.toml");

/// Video polling and progress cadence, the `[video]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Seconds between video job status checks
    pub poll_interval_secs: u64,
    /// Give up on a pending job after this many seconds; unset waits indefinitely
    pub poll_timeout_secs: Option<u64>,
    /// Seconds between rotating progress messages
    pub progress_interval_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            poll_timeout_secs: None,
            progress_interval_secs: 4,
        }
    }
}

impl VideoConfig {
    /// Intervals and the timeout must be at least one second.
    fn validate(&self) -> CinereelResult<()> {
        let zero = [
            ("video.poll_interval_secs", Some(self.poll_interval_secs)),
            ("video.progress_interval_secs", Some(self.progress_interval_secs)),
            ("video.poll_timeout_secs", self.poll_timeout_secs),
        ]
        .into_iter()
        .find(|(_, value)| *value == Some(0));
        match zero {
            Some((key, _)) => Err(ConfigError::new(format!("{} must be at least 1", key)).into()),
            None => Ok(()),
        }
    }
}

/// Where projects and clips are written, the `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store root; the platform data directory when unset
    pub root: Option<PathBuf>,
}

/// Starting values for a new draft, the `[defaults]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Visual style label
    pub visual_style: String,
    /// Language of generated scene text
    pub language: String,
    /// Scenes requested per manifest
    pub scene_count: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            visual_style: VISUAL_STYLES[0].to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            scene_count: SceneCount::default().get(),
        }
    }
}

/// Top-level Cinereel configuration.
///
/// # Example
///
/// ```no_run
/// use cinereel::CinereelConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CinereelConfig::load()?;
/// println!("Frames rendered with {}", config.gemini.image_model);
/// println!("Projects stored in {}", config.storage_root().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CinereelConfig {
    /// Gemini transport and model selection
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Video polling
    #[serde(default)]
    pub video: VideoConfig,
    /// Project storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// New draft defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl CinereelConfig {
    /// Only the bundled defaults.
    pub fn bundled() -> CinereelResult<Self> {
        Self::finish(Self::base())
    }

    /// Bundled defaults overridden by a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> CinereelResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::base().add_source(File::from(path.as_ref())))
    }

    /// Load with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and skipped when absent.
    #[instrument]
    pub fn load() -> CinereelResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::base();
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/cinereel/cinereel.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder
            .add_source(File::with_name("cinereel").required(false))
            .add_source(
                Environment::with_prefix("CINEREEL")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::finish(builder)
    }

    fn base() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> CinereelResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                CinereelError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CinereelError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.video.validate()?;
        Ok(config)
    }

    /// Project store root, `~/.local/share/cinereel` unless configured.
    pub fn storage_root(&self) -> PathBuf {
        self.storage.root.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cinereel")
        })
    }

    /// Video poll cadence.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.video.poll_interval_secs),
            timeout: self.video.poll_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Orchestrator settings; fails when the default scene count is out of range.
    pub fn studio_settings(&self) -> CinereelResult<StudioSettings> {
        let scene_count = SceneCount::new(self.defaults.scene_count)?;
        Ok(StudioSettings {
            progress_interval: Duration::from_secs(self.video.progress_interval_secs),
            draft: Draft::new(
                self.defaults.visual_style.clone(),
                self.defaults.language.clone(),
                scene_count,
            ),
        })
    }
}
