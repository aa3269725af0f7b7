//! Roster configuration.
//!
//! Per-archetype stats are loaded from JSON. Every section falls back to
//! its defaults when omitted, and the whole roster is validated before use.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::MapBounds;
use crate::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};

/// Failure while loading or validating a roster.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed roster: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {section} config: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },
}

fn invalid(section: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        section,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
        }
    }
}

impl MapConfig {
    #[must_use]
    pub fn bounds(&self) -> MapBounds {
        MapBounds::new(self.width, self.height)
    }
}

/// Melee chaser stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZombieConfig {
    pub health: f32,
    /// Velocity added per tick before damping.
    pub speed: f32,
    pub damage: f32,
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            health: 100.0,
            speed: 10.0,
            damage: 10.0,
        }
    }
}

/// Lone skeleton archer stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkeletonConfig {
    pub attack_range: f32,
    pub stop_distance: f32,
    pub attack_cooldown_ms: f32,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            attack_range: 400.0,
            stop_distance: 300.0,
            attack_cooldown_ms: 1500.0,
        }
    }
}

/// Charger stats, shared by orc riders and knights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiderConfig {
    pub detection_range: f32,
    pub hunt_range: f32,
    pub walk_speed: f32,
    pub charge_speed: f32,
    pub charge_distance: f32,
    pub damage: f32,
}

impl Default for RiderConfig {
    fn default() -> Self {
        Self {
            detection_range: 600.0,
            hunt_range: 250.0,
            walk_speed: 70.0,
            charge_speed: 500.0,
            charge_distance: 400.0,
            damage: 25.0,
        }
    }
}

/// Composition and stats of a squad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SquadConfig {
    pub archers: usize,
    pub protectors: usize,
    pub knight: bool,
    pub archer_range: f32,
    pub archer_damage: f32,
    pub archer_cooldown_ms: f32,
    pub protector_speed: f32,
    pub protector_charge_speed: f32,
    pub knight_stats: RiderConfig,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            archers: 3,
            protectors: 3,
            knight: true,
            archer_range: 400.0,
            archer_damage: 8.0,
            archer_cooldown_ms: 1500.0,
            protector_speed: 90.0,
            protector_charge_speed: 220.0,
            knight_stats: RiderConfig {
                walk_speed: 80.0,
                charge_speed: 550.0,
                damage: 30.0,
                ..RiderConfig::default()
            },
        }
    }
}

/// Full set of enemy stats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub map: MapConfig,
    pub zombie: ZombieConfig,
    pub skeleton: SkeletonConfig,
    pub rider: RiderConfig,
    pub squad: SquadConfig,
}

impl RosterConfig {
    /// Parses and validates a roster from JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a section breaks its constraints.
    ///
    /// # Examples
    /// ```
    /// use warband::config::RosterConfig;
    /// let roster = RosterConfig::from_json_str(r#"{ "zombie": { "speed": 12.0 } }"#)
    ///     .expect("valid roster");
    /// assert!((roster.zombie.speed - 12.0).abs() < f32::EPSILON);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let roster: Self = serde_json::from_str(text)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Reads, parses and validates a roster file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// as [`RosterConfig::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks the cross-field constraints serde cannot express.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width <= 0.0 || self.map.height <= 0.0 {
            return Err(invalid("map", "width and height must be positive"));
        }
        if self.zombie.speed <= 0.0 {
            return Err(invalid("zombie", "speed must be positive"));
        }
        let skeleton = &self.skeleton;
        if skeleton.stop_distance <= 0.0 || skeleton.attack_range <= 0.0 {
            return Err(invalid("skeleton", "ranges must be positive"));
        }
        if skeleton.stop_distance >= skeleton.attack_range {
            return Err(invalid(
                "skeleton",
                format!(
                    "stop_distance {} must be below attack_range {}",
                    skeleton.stop_distance, skeleton.attack_range
                ),
            ));
        }
        validate_rider("rider", &self.rider)?;
        validate_rider("squad knight", &self.squad.knight_stats)?;
        if self.squad.archer_range <= 0.0 {
            return Err(invalid("squad", "archer_range must be positive"));
        }
        Ok(())
    }
}

fn validate_rider(section: &'static str, rider: &RiderConfig) -> Result<(), ConfigError> {
    if rider.charge_speed <= 0.0 {
        return Err(invalid(section, "charge_speed must be positive"));
    }
    if rider.hunt_range >= rider.detection_range {
        return Err(invalid(
            section,
            format!(
                "hunt_range {} must be below detection_range {}",
                rider.hunt_range, rider.detection_range
            ),
        ));
    }
    Ok(())
}
