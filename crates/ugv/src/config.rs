use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use ugv_core::{
    geo::LatLng,
    motion::{MIN_TRAVEL, MotionConfig},
    vehicle::DEFAULT_START,
};

/// Main configuration for the simulator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Initial vehicle placement
    #[serde(default)]
    pub vehicle: VehicleConfig,

    /// Where waypoints are persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Frame pacing
    #[serde(default)]
    pub frames: FramesConfig,

    /// Kinematic limits
    #[serde(default)]
    pub motion: MotionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Start location as `[lat, lng]`
    #[serde(default = "default_start")]
    pub start: LatLng,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value files
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramesConfig {
    /// Frames per second
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionSettings {
    #[serde(default = "default_max_speed_kmh")]
    pub max_speed_kmh: f64,

    /// Seconds to reach max speed from rest
    #[serde(default = "default_ramp_seconds")]
    pub ramp_seconds: f64,

    /// Coordinate displacement per unit of speed per frame
    #[serde(default = "default_step")]
    pub step: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            max_speed_kmh: default_max_speed_kmh(),
            ramp_seconds: default_ramp_seconds(),
            step: default_step(),
        }
    }
}

fn default_start() -> LatLng {
    DEFAULT_START
}

fn default_storage_dir() -> String {
    "./ugv-data".to_string()
}

fn default_rate_hz() -> u32 {
    60
}

fn default_max_speed_kmh() -> f64 {
    20.0
}

fn default_ramp_seconds() -> f64 {
    3.0
}

fn default_step() -> f64 {
    0.000_000_3
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.vehicle.start.is_finite() {
            anyhow::bail!("vehicle.start must be a finite [lat, lng] pair");
        }
        if self.storage.dir.is_empty() {
            anyhow::bail!("storage.dir cannot be empty");
        }
        if self.frames.rate_hz == 0 {
            anyhow::bail!("frames.rate_hz must be positive");
        }

        let motion = &self.motion;
        for (name, value) in [
            ("motion.max_speed_kmh", motion.max_speed_kmh),
            ("motion.ramp_seconds", motion.ramp_seconds),
            ("motion.step", motion.step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("{name} must be a positive number, got {value}");
            }
        }
        if motion.step * motion.max_speed_kmh / 3.6 < MIN_TRAVEL {
            anyhow::bail!(
                "motion.step {} is too small to move the vehicle at {} km/h",
                motion.step,
                motion.max_speed_kmh
            );
        }

        Ok(())
    }

    /// Kinematic constants for the motion engine
    pub fn motion_config(&self) -> MotionConfig {
        MotionConfig::new(
            self.motion.max_speed_kmh / 3.6,
            self.motion.ramp_seconds,
            f64::from(self.frames.rate_hz),
            self.motion.step,
        )
    }
}
