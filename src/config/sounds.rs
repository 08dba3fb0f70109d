// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

use super::error::ConfigError;

/// Default game ship volume.
pub const DEFAULT_SHIP_VOLUME: f32 = 1.0;

/// Default per-sound volume.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Default rolling clip.
pub const DEFAULT_ROLLING_FILE: &str = "WheelSounds/Sounds/RoveMaxS2";

/// Default landing gear clip.
pub const DEFAULT_GEAR_FILE: &str = "WheelSounds/Sounds/nnus-gear";

const DEFAULT_MIN_RPM: f64 = 0.5;
const DEFAULT_FULL_VOLUME_RPM: f64 = 100.0;
const DEFAULT_MIN_VOLUME: f32 = 0.006;
const DEFAULT_PITCH_DIVISOR: f64 = 13.0;
const DEFAULT_MIN_TIRE_FORCE: f32 = 10.0;
const DEFAULT_FULL_VOLUME_TIRE_FORCE: f32 = 100.0;

/// A YAML representation of the sounds attached to wheel and gear parts.
#[derive(Deserialize, Clone, Debug)]
pub struct SoundsConfig {
    /// The game's ship volume setting, applied on top of every sound's volume.
    ship_volume: Option<f32>,

    /// The looping rolling sound.
    rolling: Option<RollingConfig>,

    /// The looping skid sound.
    skid: Option<SkidConfig>,

    /// The one-shot sound played when a wheel breaks.
    damage: Option<OneShotConfig>,

    /// The one-shot sound played when landing gear deploys or retracts.
    gear: Option<OneShotConfig>,
}

impl Default for SoundsConfig {
    /// The rolling and gear sounds with their stock clips.
    fn default() -> SoundsConfig {
        SoundsConfig {
            ship_volume: None,
            rolling: Some(RollingConfig::new(DEFAULT_ROLLING_FILE)),
            skid: None,
            damage: None,
            gear: Some(OneShotConfig::new(DEFAULT_GEAR_FILE)),
        }
    }
}

impl SoundsConfig {
    /// Parse a sounds configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<SoundsConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<SoundsConfig>()?)
    }

    /// Returns the ship volume (default: 1.0)
    pub fn ship_volume(&self) -> f32 {
        self.ship_volume.unwrap_or(DEFAULT_SHIP_VOLUME).max(0.0)
    }

    pub fn rolling(&self) -> Option<&RollingConfig> {
        self.rolling.as_ref()
    }

    pub fn skid(&self) -> Option<&SkidConfig> {
        self.skid.as_ref()
    }

    pub fn damage(&self) -> Option<&OneShotConfig> {
        self.damage.as_ref()
    }

    pub fn gear(&self) -> Option<&OneShotConfig> {
        self.gear.as_ref()
    }

    /// Every clip referenced by this configuration.
    pub fn all_files(&self) -> Vec<&str> {
        let mut files = Vec::new();
        if let Some(rolling) = &self.rolling {
            files.push(rolling.file());
        }
        if let Some(skid) = &self.skid {
            files.push(skid.file());
        }
        if let Some(damage) = &self.damage {
            files.push(damage.file());
        }
        if let Some(gear) = &self.gear {
            files.push(gear.file());
        }
        files
    }
}

/// Rolling sound configuration. Pitch and volume follow wheel rpm.
#[derive(Deserialize, Clone, Debug)]
pub struct RollingConfig {
    /// The clip to loop.
    file: String,

    /// Volume at or above full_volume_rpm (default: 1.0)
    volume: Option<f32>,

    /// Below or at this rpm the sound stops (default: 0.5)
    min_rpm: Option<f64>,

    /// Below this rpm the volume ramps down linearly (default: 100)
    full_volume_rpm: Option<f64>,

    /// The ramp never goes quieter than this (default: 0.006)
    min_volume: Option<f32>,

    /// Pitch is sqrt(rpm) / pitch_divisor (default: 13)
    pitch_divisor: Option<f64>,
}

impl RollingConfig {
    pub fn new(file: &str) -> RollingConfig {
        RollingConfig {
            file: file.to_string(),
            volume: None,
            min_rpm: None,
            full_volume_rpm: None,
            min_volume: None,
            pitch_divisor: None,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn volume(&self) -> f32 {
        self.volume.unwrap_or(DEFAULT_VOLUME).max(0.0)
    }

    pub fn min_rpm(&self) -> f64 {
        self.min_rpm.unwrap_or(DEFAULT_MIN_RPM)
    }

    pub fn full_volume_rpm(&self) -> f64 {
        self.full_volume_rpm.unwrap_or(DEFAULT_FULL_VOLUME_RPM)
    }

    pub fn min_volume(&self) -> f32 {
        self.min_volume.unwrap_or(DEFAULT_MIN_VOLUME)
    }

    pub fn pitch_divisor(&self) -> f64 {
        self.pitch_divisor.unwrap_or(DEFAULT_PITCH_DIVISOR)
    }
}

/// Skid sound configuration. Volume follows lateral tire force.
#[derive(Deserialize, Clone, Debug)]
pub struct SkidConfig {
    /// The clip to loop.
    file: String,

    /// Volume at or above full_volume_tire_force (default: 1.0)
    volume: Option<f32>,

    /// Lateral force at or below which the sound stops (default: 10)
    min_tire_force: Option<f32>,

    /// Lateral force at which the sound reaches full volume (default: 100)
    full_volume_tire_force: Option<f32>,
}

impl SkidConfig {
    pub fn new(file: &str) -> SkidConfig {
        SkidConfig {
            file: file.to_string(),
            volume: None,
            min_tire_force: None,
            full_volume_tire_force: None,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn volume(&self) -> f32 {
        self.volume.unwrap_or(DEFAULT_VOLUME).max(0.0)
    }

    pub fn min_tire_force(&self) -> f32 {
        self.min_tire_force.unwrap_or(DEFAULT_MIN_TIRE_FORCE)
    }

    pub fn full_volume_tire_force(&self) -> f32 {
        self.full_volume_tire_force
            .unwrap_or(DEFAULT_FULL_VOLUME_TIRE_FORCE)
            .max(self.min_tire_force())
    }
}

/// A sound that plays once per trigger.
#[derive(Deserialize, Clone, Debug)]
pub struct OneShotConfig {
    file: String,

    /// (default: 1.0)
    volume: Option<f32>,
}

impl OneShotConfig {
    pub fn new(file: &str) -> OneShotConfig {
        OneShotConfig {
            file: file.to_string(),
            volume: None,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn volume(&self) -> f32 {
        self.volume.unwrap_or(DEFAULT_VOLUME).max(0.0)
    }
}

#[cfg(test)]
impl SoundsConfig {
    /// Creates a sounds configuration (test only).
    pub fn new(
        ship_volume: Option<f32>,
        rolling: Option<RollingConfig>,
        skid: Option<SkidConfig>,
        damage: Option<OneShotConfig>,
        gear: Option<OneShotConfig>,
    ) -> SoundsConfig {
        SoundsConfig {
            ship_volume,
            rolling,
            skid,
            damage,
            gear,
        }
    }
}
