//! Demo configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `kestrel.ron` in the working directory, or the file given on the
//!    command line
//! 3. Environment variables prefixed with `KESTREL_`
//!
//! Example environment variable: `KESTREL_FIREWORKS__SPARKS_PER_BURST=64`

use std::path::Path;

use anyhow::{Context, Result, ensure};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Config file looked up when none is given
pub const DEFAULT_CONFIG_FILE: &str = "kestrel";

/// Main demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DemoConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub fireworks: FireworksConfig,

    #[serde(default)]
    pub camera: CameraConfig,
}

/// Framebuffer and render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
    /// Render every frame instead of only when something changed
    pub continuous_render: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 544,
            continuous_render: false,
        }
    }
}

/// Frame loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames to simulate
    pub frames: u64,
    /// Simulated seconds per frame
    pub timestep: f32,
    /// Seed for the launch and burst RNG
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            timestep: 1.0 / 60.0,
            seed: 42,
        }
    }
}

/// Rocket and spark behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// Particles preallocated for rockets and sparks together
    pub pool_size: u32,
    /// Seconds between rocket launches
    pub launch_interval: f32,
    /// Launch speed range in units/sec
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    /// Seconds from launch to burst
    pub fuse_min: f32,
    pub fuse_max: f32,
    pub sparks_per_burst: u32,
    /// Top spark speed in units/sec; sparks leave at 50-100% of it
    pub spark_speed: f32,
    /// Seconds a spark stays lit
    pub spark_lifetime: f32,
    /// Downward acceleration in units/sec^2
    pub gravity: f32,
    /// Linear drag coefficient
    pub drag_k1: f32,
    /// Quadratic drag coefficient
    pub drag_k2: f32,
    /// Fraction of velocity kept per second
    pub damping: f32,
    pub particle_mass: f32,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            pool_size: 512,
            launch_interval: 0.5,
            launch_speed_min: 260.0,
            launch_speed_max: 340.0,
            fuse_min: 0.8,
            fuse_max: 1.4,
            sparks_per_burst: 48,
            spark_speed: 120.0,
            spark_lifetime: 1.2,
            gravity: 98.0,
            drag_k1: 0.02,
            drag_k2: 0.001,
            damping: 0.99,
            particle_mass: 1.0,
        }
    }
}

/// World camera animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub zoom_start: f32,
    pub zoom_end: f32,
    /// Seconds to go from `zoom_start` to `zoom_end`; the camera pans for as long
    pub zoom_seconds: f32,
    /// Pan speed in units/sec
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_start: 1.0,
            zoom_end: 0.8,
            zoom_seconds: 4.0,
            pan_x: 0.0,
            pan_y: 12.0,
        }
    }
}

impl DemoConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path`, or `kestrel.ron` if it exists
    /// 3. Environment variables prefixed with `KESTREL_` (highest priority)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE)
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("display.width", 960_i64)?
            .set_default("display.height", 544_i64)?
            .set_default("display.continuous_render", false)?
            .set_default("run.frames", 600_i64)?
            .set_default("run.timestep", 1.0 / 60.0)?
            .set_default("run.seed", 42_i64)?
            .set_default("fireworks.pool_size", 512_i64)?
            .set_default("fireworks.launch_interval", 0.5)?
            .set_default("fireworks.launch_speed_min", 260.0)?
            .set_default("fireworks.launch_speed_max", 340.0)?
            .set_default("fireworks.fuse_min", 0.8)?
            .set_default("fireworks.fuse_max", 1.4)?
            .set_default("fireworks.sparks_per_burst", 48_i64)?
            .set_default("fireworks.spark_speed", 120.0)?
            .set_default("fireworks.spark_lifetime", 1.2)?
            .set_default("fireworks.gravity", 98.0)?
            .set_default("fireworks.drag_k1", 0.02)?
            .set_default("fireworks.drag_k2", 0.001)?
            .set_default("fireworks.damping", 0.99)?
            .set_default("fireworks.particle_mass", 1.0)?
            .set_default("camera.zoom_start", 1.0)?
            .set_default("camera.zoom_end", 0.8)?
            .set_default("camera.zoom_seconds", 4.0)?
            .set_default("camera.pan_x", 0.0)?
            .set_default("camera.pan_y", 12.0)?
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (KESTREL_RUN__SEED, etc.)
            .add_source(Environment::with_prefix("KESTREL").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the frame loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        let display = &self.display;
        ensure!(
            display.width > 0 && display.height > 0,
            "display must be at least 1x1, got {}x{}",
            display.width,
            display.height
        );

        let run = &self.run;
        ensure!(
            run.timestep.is_finite() && run.timestep > 0.0,
            "timestep must be positive, got {}",
            run.timestep
        );

        let fw = &self.fireworks;
        ensure!(fw.pool_size > 0, "pool_size must be at least 1");
        ensure!(
            fw.sparks_per_burst > 0 && fw.sparks_per_burst < fw.pool_size,
            "sparks_per_burst must be between 1 and pool_size - 1, got {}",
            fw.sparks_per_burst
        );
        ensure!(
            fw.launch_interval >= run.timestep / 64.0,
            "launch_interval must be at least timestep / 64 ({}), got {}",
            run.timestep / 64.0,
            fw.launch_interval
        );
        ensure!(
            0.0 <= fw.launch_speed_min && fw.launch_speed_min <= fw.launch_speed_max,
            "launch speed range {}..{} is empty",
            fw.launch_speed_min,
            fw.launch_speed_max
        );
        ensure!(
            0.0 < fw.fuse_min && fw.fuse_min <= fw.fuse_max,
            "fuse range {}..{} is empty",
            fw.fuse_min,
            fw.fuse_max
        );
        ensure!(
            fw.spark_speed >= 0.0 && fw.spark_lifetime > 0.0,
            "sparks need a non-negative speed and a positive lifetime"
        );

        let camera = &self.camera;
        ensure!(
            camera.zoom_start > 0.0 && camera.zoom_end > 0.0,
            "zoom must be positive"
        );
        ensure!(camera.zoom_seconds >= 0.0, "zoom_seconds must not be negative");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DemoConfig::default();
        assert_eq!(config.display.width, 960);
        assert_eq!(config.run.seed, 42);
        assert_eq!(config.fireworks.sparks_per_burst, 48);
        assert!(!config.display.continuous_render);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_with_defaults() {
        // No kestrel.ron next to the test binary
        let config = DemoConfig::load(None).expect("Failed to load config");
        assert_eq!(config.fireworks.pool_size, 512);
        assert_eq!(config.camera.zoom_end, 0.8);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(DemoConfig::load(Some(Path::new("does/not/exist.ron"))).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DemoConfig::default();
        config.run.timestep = 0.0;
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.fireworks.sparks_per_burst = config.fireworks.pool_size;
        assert!(config.validate().is_err());

        let mut config = DemoConfig::default();
        config.fireworks.fuse_min = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_launch_interval_floor() {
        let mut config = DemoConfig::default();
        config.fireworks.launch_interval = 1e-9;
        assert!(config.validate().is_err());

        config.fireworks.launch_interval = config.run.timestep / 64.0;
        assert!(config.validate().is_ok());

        config.fireworks.launch_interval = 0.0;
        assert!(config.validate().is_err());
    }
}
