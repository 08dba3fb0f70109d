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
use std::{fmt, sync::Arc};

use rand::Rng;
use tracing::{debug, error, info};

use super::{
    load_source, DamageSound, GearSound, RollingSound, SkidSound, SoundError, SoundStatus,
};
use crate::{
    adapter::{AdapterKind, CapabilityProbe, WheelAdapter},
    audio::Library,
    config::SoundsConfig,
    host::{Part, TypeRegistry},
};

/// Every sound attached to a single part.
///
/// The first error disables the part's sounds for good: a broken part goes
/// quiet instead of logging every frame.
pub struct PartSounds {
    part: Arc<dyn Part>,
    registry: Arc<dyn TypeRegistry>,
    probe: Option<Arc<CapabilityProbe>>,
    adapter: Option<WheelAdapter>,
    rolling: Option<RollingSound>,
    skid: Option<SkidSound>,
    damage: Option<DamageSound>,
    gear: Option<GearSound>,
    paused: bool,
    disabled: bool,
}

impl PartSounds {
    /// Attaches the configured sounds to the part. Wheel sounds are attached to
    /// every part; landing gear sounds only to parts with landing gear. The
    /// wheel adapter isn't built until the first update.
    ///
    /// Without a probe, the process-wide legacy probe is used.
    pub fn start<R: Rng + ?Sized>(
        part: Arc<dyn Part>,
        registry: Arc<dyn TypeRegistry>,
        library: &dyn Library,
        config: &SoundsConfig,
        rng: &mut R,
        probe: Option<Arc<CapabilityProbe>>,
    ) -> PartSounds {
        let mut sounds = PartSounds {
            part,
            registry,
            probe,
            adapter: None,
            rolling: None,
            skid: None,
            damage: None,
            gear: None,
            paused: false,
            disabled: false,
        };

        if let Err(e) = sounds.attach(library, config, rng) {
            sounds.fail(&e);
        } else {
            info!(
                part = sounds.part.name(),
                sounds = sounds.statuses().len(),
                "Attached wheel sounds"
            );
        }
        sounds
    }

    fn attach<R: Rng + ?Sized>(
        &mut self,
        library: &dyn Library,
        config: &SoundsConfig,
        rng: &mut R,
    ) -> Result<(), SoundError> {
        let name = self.part.name().to_string();
        let ship_volume = config.ship_volume();

        if let Some(rolling) = config.rolling() {
            if let Some(source) = load_source(library, &name, rolling.file())? {
                self.rolling = Some(RollingSound::start(source, rolling, ship_volume, rng)?);
            }
        }
        if let Some(skid) = config.skid() {
            if let Some(source) = load_source(library, &name, skid.file())? {
                self.skid = Some(SkidSound::start(source, skid, ship_volume));
            }
        }
        if let Some(damage) = config.damage() {
            if let Some(source) = load_source(library, &name, damage.file())? {
                self.damage = Some(DamageSound::start(source, damage, ship_volume));
            }
        }
        if let (Some(gear), Some(landing_gear)) = (config.gear(), self.part.landing_gear()) {
            if let Some(source) = load_source(library, &name, gear.file())? {
                self.gear = Some(GearSound::start(
                    source,
                    gear,
                    ship_volume,
                    landing_gear.as_ref(),
                ));
            }
        }
        Ok(())
    }

    /// Ticks every sound. Does nothing while paused or once disabled.
    pub fn update(&mut self) {
        if self.disabled || self.paused {
            return;
        }
        if let Err(e) = self.try_update() {
            self.fail(&e);
        }
    }

    fn try_update(&mut self) -> Result<(), SoundError> {
        let adapter = match self.adapter.take() {
            Some(adapter) => adapter,
            None => {
                let part = Some(self.part.as_ref());
                match &self.probe {
                    Some(probe) => WheelAdapter::with_probe(part, self.registry.as_ref(), probe)?,
                    None => WheelAdapter::new(part, self.registry.as_ref())?,
                }
            }
        };
        let adapter = &*self.adapter.insert(adapter);

        if let Some(rolling) = &self.rolling {
            rolling.update(adapter)?;
        }
        if let Some(skid) = &self.skid {
            skid.update(adapter)?;
        }
        if let Some(damage) = &mut self.damage {
            damage.update(adapter)?;
        }
        if let Some(gear) = &mut self.gear {
            if let Some(landing_gear) = self.part.landing_gear() {
                gear.update(landing_gear.as_ref())?;
            }
        }
        Ok(())
    }

    fn fail(&mut self, e: &SoundError) {
        error!(
            part = self.part.name(),
            err = %e,
            "Wheel sounds failed, disabling them for this part"
        );
        self.stop_all();
        self.disabled = true;
    }

    /// Silences every sound until the game is unpaused.
    pub fn on_pause(&mut self) {
        debug!(part = self.part.name(), "Pausing wheel sounds");
        self.paused = true;
        self.stop_all();
    }

    /// Resumes updates and re-applies the ship volume, which may have changed
    /// while the game was paused.
    pub fn on_unpause(&mut self, ship_volume: f32) {
        debug!(part = self.part.name(), ship_volume, "Resuming wheel sounds");
        self.paused = false;
        let ship_volume = ship_volume.max(0.0);
        if let Some(rolling) = &mut self.rolling {
            rolling.set_ship_volume(ship_volume);
        }
        if let Some(skid) = &mut self.skid {
            skid.set_ship_volume(ship_volume);
        }
        if let Some(damage) = &mut self.damage {
            damage.set_ship_volume(ship_volume);
        }
        if let Some(gear) = &mut self.gear {
            gear.set_ship_volume(ship_volume);
        }
    }

    fn stop_all(&self) {
        if let Some(rolling) = &self.rolling {
            rolling.stop();
        }
        if let Some(skid) = &self.skid {
            skid.stop();
        }
        if let Some(damage) = &self.damage {
            damage.stop();
        }
        if let Some(gear) = &self.gear {
            gear.stop();
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The wheel adapter, once the first update has built it.
    pub fn adapter(&self) -> Option<&WheelAdapter> {
        self.adapter.as_ref()
    }

    fn statuses(&self) -> Vec<SoundStatus> {
        let mut statuses = Vec::new();
        if let Some(rolling) = &self.rolling {
            statuses.push(rolling.status());
        }
        if let Some(skid) = &self.skid {
            statuses.push(skid.status());
        }
        if let Some(damage) = &self.damage {
            statuses.push(damage.status());
        }
        if let Some(gear) = &self.gear {
            statuses.push(gear.status());
        }
        statuses
    }

    /// A snapshot of the part's adapter and sources.
    pub fn status(&self) -> PartStatus {
        PartStatus {
            part: self.part.name().to_string(),
            kind: self.adapter.as_ref().map(WheelAdapter::kind),
            valid: self.adapter.as_ref().is_some_and(WheelAdapter::is_valid),
            rpm: self.adapter.as_ref().map_or(0.0, WheelAdapter::rpm),
            disabled: self.disabled,
            sounds: self.statuses(),
        }
    }
}

/// The state of a part's sounds at a point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct PartStatus {
    pub part: String,
    pub kind: Option<AdapterKind>,
    pub valid: bool,
    pub rpm: f64,
    pub disabled: bool,
    pub sounds: Vec<SoundStatus>,
}

impl PartStatus {
    /// Returns the status of the named sound, if it's attached.
    pub fn sound(&self, name: &str) -> Option<&SoundStatus> {
        self.sounds.iter().find(|sound| sound.name == name)
    }
}

impl fmt::Display for PartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Some(kind) => kind.to_string(),
            None => "pending".to_string(),
        };
        write!(f, "{} [{}", self.part, kind)?;
        if !self.valid {
            write!(f, ", invalid")?;
        }
        if self.disabled {
            write!(f, ", disabled")?;
        }
        write!(f, "] rpm {:.1}", self.rpm)?;
        for sound in &self.sounds {
            write!(f, "; {}", sound)?;
        }
        Ok(())
    }
}
