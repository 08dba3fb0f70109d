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

//! Simulator scenarios: a set of parts and a tick-by-tick script of what their
//! wheels are doing.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

use super::error::ConfigError;
use super::sounds::SoundsConfig;
use crate::host::GearState;

/// Length given to clips the scenario doesn't list explicitly.
pub const DEFAULT_CLIP_LENGTH: f32 = 2.0;

/// How the legacy wheel module looks to the host in this scenario.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LegacyLayoutKind {
    /// All legacy types and fields are present.
    #[default]
    Compatible,
    /// The legacy assembly isn't loaded.
    MissingTypes,
    /// The types exist but the module's wheel list field is gone.
    MissingFields,
}

/// The wheel hardware a part carries.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// A stock wheel.
    Stock,
    /// A legacy third-party wheel.
    Legacy,
    /// Landing gear with a stock wheel.
    Gear,
    /// No wheel modules at all.
    #[serde(rename = "none")]
    Bare,
}

/// A YAML representation of a scenario.
#[derive(Deserialize, Clone, Debug)]
pub struct Scenario {
    #[serde(default)]
    legacy_layout: LegacyLayoutKind,

    #[serde(default)]
    sounds: SoundsConfig,

    /// The clips the host has loaded. When empty, every configured clip exists.
    #[serde(default)]
    clips: Vec<ClipDefinition>,

    parts: Vec<PartDefinition>,

    #[serde(default)]
    ticks: Vec<Tick>,
}

impl Scenario {
    /// Parse and validate a scenario from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Scenario, ConfigError> {
        let scenario = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Scenario>()?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Checks that part names are unique and that ticks only mention known parts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for part in &self.parts {
            if !names.insert(part.name.as_str()) {
                return Err(ConfigError::Scenario(format!(
                    "duplicate part name {}",
                    part.name
                )));
            }
            if part.kind == PartKind::Legacy && part.missing_colliders() > part.wheels() {
                return Err(ConfigError::Scenario(format!(
                    "part {} has more missing colliders than wheels",
                    part.name
                )));
            }
        }

        for (index, tick) in self.ticks.iter().enumerate() {
            if let Some(unknown) = tick
                .parts
                .iter()
                .find(|telemetry| !names.contains(telemetry.part.as_str()))
            {
                return Err(ConfigError::Scenario(format!(
                    "tick {} refers to unknown part {}",
                    index, unknown.part
                )));
            }
        }

        Ok(())
    }

    pub fn legacy_layout(&self) -> LegacyLayoutKind {
        self.legacy_layout
    }

    pub fn sounds(&self) -> &SoundsConfig {
        &self.sounds
    }

    /// The clips available to the simulated host, with their lengths.
    pub fn clips(&self) -> HashMap<String, f32> {
        if !self.clips.is_empty() {
            return self
                .clips
                .iter()
                .map(|clip| (clip.name.clone(), clip.length()))
                .collect();
        }
        self.sounds
            .all_files()
            .into_iter()
            .map(|file| (file.to_string(), DEFAULT_CLIP_LENGTH))
            .collect()
    }

    pub fn parts(&self) -> &[PartDefinition] {
        &self.parts
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }
}

/// A clip loaded by the simulated host.
#[derive(Deserialize, Clone, Debug)]
pub struct ClipDefinition {
    name: String,

    /// Length in seconds (default: 2.0)
    length: Option<f32>,
}

impl ClipDefinition {
    pub fn length(&self) -> f32 {
        self.length.unwrap_or(DEFAULT_CLIP_LENGTH).max(0.0)
    }
}

/// A part in a scenario.
#[derive(Deserialize, Clone, Debug)]
pub struct PartDefinition {
    name: String,

    kind: PartKind,

    /// Stock only: attach a motor module (default: true)
    motor: Option<bool>,

    /// Stock only: attach a motor/steering module (default: false)
    steering_motor: Option<bool>,

    /// Stock only: attach a damage module (default: true)
    damageable: Option<bool>,

    /// Legacy only: number of wheel entries (default: 1)
    wheels: Option<usize>,

    /// Legacy only: how many of the wheel entries lack a physical wheel (default: 0)
    missing_colliders: Option<usize>,
}

impl PartDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PartKind {
        self.kind
    }

    pub fn motor(&self) -> bool {
        self.motor.unwrap_or(true)
    }

    pub fn steering_motor(&self) -> bool {
        self.steering_motor.unwrap_or(false)
    }

    pub fn damageable(&self) -> bool {
        self.damageable.unwrap_or(true)
    }

    pub fn wheels(&self) -> usize {
        self.wheels.unwrap_or(1)
    }

    pub fn missing_colliders(&self) -> usize {
        self.missing_colliders.unwrap_or(0)
    }
}

/// One step of the scenario script.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Tick {
    /// How many simulation ticks this step lasts (default: 1)
    repeat: Option<u32>,

    /// Pauses or unpauses the game at the start of this step.
    paused: Option<bool>,

    /// Changes the ship volume setting. Takes effect on the next unpause.
    ship_volume: Option<f32>,

    /// Telemetry changes per part. Unmentioned parts keep their state.
    #[serde(default)]
    parts: Vec<Telemetry>,
}

impl Tick {
    pub fn repeat(&self) -> u32 {
        self.repeat.unwrap_or(1).max(1)
    }

    pub fn paused(&self) -> Option<bool> {
        self.paused
    }

    pub fn ship_volume(&self) -> Option<f32> {
        self.ship_volume
    }

    pub fn parts(&self) -> &[Telemetry] {
        &self.parts
    }

    /// The telemetry for the named part, if this step changes it.
    pub fn telemetry(&self, part: &str) -> Option<&Telemetry> {
        self.parts.iter().find(|telemetry| telemetry.part == part)
    }
}

/// Wheel state changes for a part.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Telemetry {
    /// The part this applies to.
    pub part: String,

    /// Wheel rpm. Applied to every physical wheel of the part.
    pub rpm: Option<f32>,

    /// Tire force as [lateral, longitudinal].
    pub tire_force: Option<[f32; 2]>,

    pub motor_enabled: Option<bool>,

    pub damaged: Option<bool>,

    /// Stock wheels only: false retracts the wheel.
    pub deployed: Option<bool>,

    /// Landing gear only.
    pub gear: Option<GearState>,
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    fn parse(yaml: &str) -> Scenario {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_deserialize_scenario() {
        let scenario = parse(
            r#"
            legacy_layout: missing_fields
            clips:
              - name: WheelSounds/Sounds/RoveMaxS2
                length: 4.5
              - name: WheelSounds/Sounds/nnus-gear.ogg
            parts:
              - name: rover
                kind: stock
                steering_motor: true
              - name: fswheel
                kind: legacy
                wheels: 3
                missing_colliders: 1
              - name: gear
                kind: gear
            ticks:
              - repeat: 10
                parts:
                  - part: rover
                    rpm: 120
                    tire_force: [15, 2]
                  - part: gear
                    gear: retracting
              - paused: true
                ship_volume: 0.5
            "#,
        );
        scenario.validate().unwrap();

        assert_eq!(scenario.legacy_layout(), LegacyLayoutKind::MissingFields);
        let clips = scenario.clips();
        assert_eq!(clips.get("WheelSounds/Sounds/RoveMaxS2"), Some(&4.5));
        assert_eq!(
            clips.get("WheelSounds/Sounds/nnus-gear.ogg"),
            Some(&DEFAULT_CLIP_LENGTH)
        );
        assert!(scenario.sounds().rolling().is_some());

        let parts = scenario.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].kind(), PartKind::Stock);
        assert!(parts[0].motor());
        assert!(parts[0].steering_motor());
        assert_eq!(parts[1].wheels(), 3);
        assert_eq!(parts[1].missing_colliders(), 1);
        assert_eq!(parts[2].kind(), PartKind::Gear);

        let ticks = scenario.ticks();
        assert_eq!(ticks[0].repeat(), 10);
        let rover = ticks[0].telemetry("rover").unwrap();
        assert_eq!(rover.rpm, Some(120.0));
        assert_eq!(rover.tire_force, Some([15.0, 2.0]));
        assert_eq!(ticks[0].telemetry("gear").unwrap().gear, Some(GearState::Retracting));
        assert!(ticks[0].telemetry("fswheel").is_none());
        assert_eq!(ticks[1].repeat(), 1);
        assert_eq!(ticks[1].paused(), Some(true));
        assert_eq!(ticks[1].ship_volume(), Some(0.5));
    }

    #[test]
    fn test_default_clips_cover_configured_sounds() {
        let scenario = parse(
            r#"
            parts:
              - name: rover
                kind: stock
            "#,
        );

        let clips = scenario.clips();
        assert_eq!(clips.len(), 2);
        assert_eq!(
            clips.get("WheelSounds/Sounds/RoveMaxS2"),
            Some(&DEFAULT_CLIP_LENGTH)
        );
        assert_eq!(scenario.legacy_layout(), LegacyLayoutKind::Compatible);
        assert!(scenario.ticks().is_empty());
    }

    #[test]
    fn test_part_without_wheel_modules() {
        let scenario = parse(
            r#"
            parts:
              - name: strut
                kind: none
            "#,
        );

        assert_eq!(scenario.parts()[0].kind(), PartKind::Bare);
    }

    #[test]
    fn test_validate_rejects_unknown_part() {
        let scenario = parse(
            r#"
            parts:
              - name: rover
                kind: stock
            ticks:
              - parts:
                  - part: ghost
                    rpm: 10
            "#,
        );

        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("unknown part ghost"));
    }

    #[test]
    fn test_validate_rejects_duplicate_part() {
        let scenario = parse(
            r#"
            parts:
              - name: rover
                kind: stock
              - name: rover
                kind: legacy
            "#,
        );

        assert!(matches!(scenario.validate(), Err(ConfigError::Scenario(_))));
    }

    #[test]
    fn test_validate_rejects_impossible_legacy_part() {
        let scenario = parse(
            r#"
            parts:
              - name: fswheel
                kind: legacy
                wheels: 2
                missing_colliders: 3
            "#,
        );

        assert!(matches!(scenario.validate(), Err(ConfigError::Scenario(_))));
    }
}
