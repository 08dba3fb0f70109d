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
use std::sync::Arc;

use tracing::debug;

use super::{effective_volume, SoundError, SoundStatus};
use crate::{adapter::WheelAdapter, audio::Source, config::sounds::OneShotConfig};

/// Plays once when the wheel breaks.
pub struct DamageSound {
    source: Arc<dyn Source>,
    config: OneShotConfig,
    was_damaged: Option<bool>,
}

impl DamageSound {
    pub fn start(source: Arc<dyn Source>, config: &OneShotConfig, ship_volume: f32) -> DamageSound {
        source.set_looping(false);
        source.set_volume(effective_volume(config.volume(), ship_volume));
        DamageSound {
            source,
            config: config.clone(),
            was_damaged: None,
        }
    }

    /// Plays on the transition from intact to damaged. A wheel that is already
    /// broken the first time it's seen stays quiet.
    pub fn update(&mut self, adapter: &WheelAdapter) -> Result<(), SoundError> {
        if !adapter.is_valid() {
            return Ok(());
        }

        let damaged = adapter.is_damaged();
        let previous = self.was_damaged.replace(damaged);
        if previous == Some(false) && damaged {
            debug!(clip = self.source.clip(), "Wheel damaged");
            self.source.set_time(0.0)?;
            self.source.play()?;
        }
        Ok(())
    }

    pub fn set_ship_volume(&mut self, ship_volume: f32) {
        self.source
            .set_volume(effective_volume(self.config.volume(), ship_volume));
    }

    pub fn stop(&self) {
        self.source.stop();
    }

    pub fn status(&self) -> SoundStatus {
        SoundStatus::of("damage", self.source.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapter::{CapabilityProbe, FIRESPITTER},
        audio::mock,
        host::mock::{self as host, Collider, Hub, Registry},
    };

    fn setup(damaged: bool) -> (Arc<host::Damage>, WheelAdapter, Arc<mock::Source>, DamageSound) {
        let damage = host::Damage::new(damaged);
        let part = host::Part::new("rover")
            .with_wheel_base(host::WheelBase::new(Hub::new(Some(Collider::new(0.0)))))
            .with_damage(Arc::clone(&damage));
        let adapter = WheelAdapter::with_probe(
            Some(&part),
            &Registry::new(),
            &CapabilityProbe::new(&FIRESPITTER),
        )
        .unwrap();

        let source = Arc::new(mock::Source::new("Sounds/crunch", 1.0));
        let sound = DamageSound::start(
            Arc::clone(&source) as Arc<dyn Source>,
            &OneShotConfig::new("Sounds/crunch"),
            0.5,
        );
        (damage, adapter, source, sound)
    }

    #[test]
    fn test_plays_once_on_break() {
        let (damage, adapter, source, mut sound) = setup(false);
        assert!(!source.is_looping());
        assert_eq!(source.volume(), 0.5);

        sound.update(&adapter).unwrap();
        assert_eq!(source.plays(), 0);

        damage.set_damaged(true);
        sound.update(&adapter).unwrap();
        sound.update(&adapter).unwrap();
        assert_eq!(source.plays(), 1);

        // Repaired and broken again.
        damage.set_damaged(false);
        sound.update(&adapter).unwrap();
        damage.set_damaged(true);
        sound.update(&adapter).unwrap();
        assert_eq!(source.plays(), 2);
    }

    #[test]
    fn test_already_broken_stays_quiet() {
        let (_damage, adapter, source, mut sound) = setup(true);

        sound.update(&adapter).unwrap();
        sound.update(&adapter).unwrap();
        assert_eq!(source.plays(), 0);
    }
}
