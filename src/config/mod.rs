//! Configuration system with YAML schema and validation.
//!
//! - Type-safe configuration structs with defaults for every field
//! - Schema checks via `validator`
//! - Semantic checks that span fields

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{OrreryError, OrreryResult};
use crate::orbit::body::BodyRegistry;

/// Top-level service configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OrreryConfig {
    /// HTTP server settings.
    #[validate(nested)]
    #[serde(default)]
    pub server: ServerConfig,

    /// Render cache settings.
    #[validate(nested)]
    #[serde(default)]
    pub cache: CacheConfig,

    /// Static figure settings.
    #[validate(nested)]
    #[serde(default)]
    pub render: RenderConfig,

    /// Animation settings.
    #[validate(nested)]
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Optional YAML list of bodies replacing the built-in registry.
    #[serde(default)]
    pub bodies_path: Option<PathBuf>,
}

impl OrreryConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> OrreryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> OrreryResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first failed constraint.
    pub fn check(&self) -> OrreryResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> OrreryConfigBuilder {
        OrreryConfigBuilder::default()
    }

    fn validate_semantic(&self) -> OrreryResult<()> {
        if self.cache.dir.as_os_str().is_empty() {
            return Err(OrreryError::config("cache.dir must not be empty"));
        }

        // GIF frame delays are whole hundredths of a second.
        if self.animation.fps > 100 {
            return Err(OrreryError::config(format!(
                "animation.fps must not exceed 100, got {}",
                self.animation.fps
            )));
        }

        if !(self.animation.frames_per_revolution.is_finite()
            && self.animation.frames_per_revolution > 0.0)
        {
            return Err(OrreryError::config(
                "animation.frames_per_revolution must be positive",
            ));
        }

        Ok(())
    }

    /// Body registry: the YAML file named by `bodies_path`, or the built-in
    /// solar system.
    ///
    /// # Errors
    ///
    /// Returns error if the bodies file cannot be loaded or validated.
    pub fn registry(&self) -> OrreryResult<BodyRegistry> {
        match &self.bodies_path {
            Some(path) => BodyRegistry::load(path),
            None => Ok(BodyRegistry::solar_system()),
        }
    }

    /// `host:port` for the HTTP listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct OrreryConfigBuilder {
    port: Option<u16>,
    cache_dir: Option<PathBuf>,
    fps: Option<u16>,
    animation_size: Option<u32>,
    bodies_path: Option<PathBuf>,
}

impl OrreryConfigBuilder {
    /// Set the listening port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the cache directory.
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set the animation frame rate.
    #[must_use]
    pub const fn fps(mut self, fps: u16) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set the animation canvas edge in pixels.
    #[must_use]
    pub const fn animation_size(mut self, size: u32) -> Self {
        self.animation_size = Some(size);
        self
    }

    /// Load bodies from a YAML file.
    #[must_use]
    pub fn bodies_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bodies_path = Some(path.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> OrreryConfig {
        let mut config = OrreryConfig::default();

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.cache_dir {
            config.cache.dir = dir;
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
        if let Some(size) = self.animation_size {
            config.animation.size = size;
        }
        if self.bodies_path.is_some() {
            config.bodies_path = self.bodies_path;
        }

        config
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address.
    #[validate(length(min = 1))]
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Render cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Directory holding flags and artifacts.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

/// Static figure size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Width in pixels.
    #[validate(range(min = 100, max = 4096))]
    #[serde(default = "default_figure_size")]
    pub width: u32,
    /// Height in pixels.
    #[validate(range(min = 100, max = 4096))]
    #[serde(default = "default_figure_size")]
    pub height: u32,
}

const fn default_figure_size() -> u32 {
    800
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_figure_size(),
            height: default_figure_size(),
        }
    }
}

/// Animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    /// Playback frame rate.
    #[validate(range(min = 1))]
    #[serde(default = "default_fps")]
    pub fps: u16,
    /// Frames per revolution of a body with `modified_p = 1`.
    #[serde(default = "default_frames_per_revolution")]
    pub frames_per_revolution: f64,
    /// Square canvas edge in pixels.
    #[validate(range(min = 100, max = 2048))]
    #[serde(default = "default_animation_size")]
    pub size: u32,
}

const fn default_fps() -> u16 {
    15
}

const fn default_frames_per_revolution() -> f64 {
    15.0
}

const fn default_animation_size() -> u32 {
    480
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            frames_per_revolution: default_frames_per_revolution(),
            size: default_animation_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OrreryConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.cache.dir, PathBuf::from("cache"));
        assert_eq!(config.render.width, 800);
        assert_eq!(config.animation.fps, 15);
        assert!((config.animation.frames_per_revolution - 15.0).abs() < f64::EPSILON);
        assert!(config.bodies_path.is_none());
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = OrreryConfig::builder()
            .port(9000)
            .cache_dir("/tmp/orrery")
            .fps(10)
            .animation_size(320)
            .build();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.cache.dir, PathBuf::from("/tmp/orrery"));
        assert_eq!(config.animation.fps, 10);
        assert_eq!(config.animation.size, 320);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
server:
  port: 8080
animation:
  fps: 20
";
        let config = OrreryConfig::from_yaml(yaml);
        assert!(config.is_ok());

        let config = config.ok();
        assert_eq!(config.as_ref().map(|c| c.server.port), Some(8080));
        assert_eq!(config.as_ref().map(|c| c.animation.fps), Some(20));
        assert_eq!(config.as_ref().map(|c| c.render.height), Some(800));
    }

    #[test]
    fn test_config_empty_yaml_uses_defaults() {
        let config = OrreryConfig::from_yaml("{}").ok();
        assert_eq!(config, Some(OrreryConfig::default()));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(OrreryConfig::from_yaml("colour: red").is_err());
        assert!(OrreryConfig::from_yaml("server:\n  hots: x").is_err());
    }

    #[test]
    fn test_config_rejects_small_figure() {
        let result = OrreryConfig::from_yaml("render:\n  width: 10");
        assert!(matches!(result, Err(OrreryError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_zero_fps() {
        let result = OrreryConfig::from_yaml("animation:\n  fps: 0");
        assert!(matches!(result, Err(OrreryError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_fast_fps() {
        let result = OrreryConfig::from_yaml("animation:\n  fps: 500");
        assert!(matches!(result, Err(OrreryError::Config { .. })));
    }

    #[test]
    fn test_config_rejects_bad_pacing() {
        let result = OrreryConfig::from_yaml("animation:\n  frames_per_revolution: -1.0");
        assert!(matches!(result, Err(OrreryError::Config { .. })));
    }

    #[test]
    fn test_config_load_file() {
        let dir = tempfile::tempdir().ok().unwrap();
        let path = dir.path().join("orrery.yaml");
        std::fs::write(&path, "cache:\n  dir: /var/cache/orrery\n").ok().unwrap();

        let config = OrreryConfig::load(&path).ok().unwrap();
        assert_eq!(config.cache.dir, PathBuf::from("/var/cache/orrery"));
    }

    #[test]
    fn test_config_missing_file() {
        let result = OrreryConfig::load("/nonexistent/orrery.yaml");
        assert!(matches!(result, Err(OrreryError::Io(_))));
    }

    #[test]
    fn test_registry_default_and_custom() {
        let config = OrreryConfig::default();
        assert_eq!(config.registry().map(|r| r.len()).ok(), Some(9));

        let dir = tempfile::tempdir().ok().unwrap();
        let path = dir.path().join("bodies.yaml");
        std::fs::write(
            &path,
            "- {name: Ceres, a: 2.77, ecc: 0.08, p: 4.6, modified_p: 4.6, beta: 10.6}\n",
        )
        .ok()
        .unwrap();

        let config = OrreryConfig::builder().bodies_path(&path).build();
        let registry = config.registry().ok().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["Ceres"]);
    }
}
