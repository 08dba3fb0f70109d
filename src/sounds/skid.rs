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

use super::{effective_volume, SoundError, SoundStatus};
use crate::{adapter::WheelAdapter, audio::Source, config::sounds::SkidConfig};

/// The looping skid sound. Volume follows the lateral tire force.
pub struct SkidSound {
    source: Arc<dyn Source>,
    config: SkidConfig,
    volume: f32,
}

impl SkidSound {
    pub fn start(source: Arc<dyn Source>, config: &SkidConfig, ship_volume: f32) -> SkidSound {
        let volume = effective_volume(config.volume(), ship_volume);
        source.set_looping(true);
        source.set_volume(volume);
        SkidSound {
            source,
            config: config.clone(),
            volume,
        }
    }

    /// Ticks the sound. Nothing an invalid adapter reports can be trusted, so
    /// it silences the sound.
    pub fn update(&self, adapter: &WheelAdapter) -> Result<(), SoundError> {
        if !adapter.is_valid() {
            self.source.stop();
            return Ok(());
        }

        let lateral = adapter.tire_force().x.abs();
        if adapter.is_damaged() || lateral <= self.config.min_tire_force() {
            self.source.stop();
            return Ok(());
        }

        let full = self.config.full_volume_tire_force();
        let ramp = if full > 0.0 { (lateral / full).min(1.0) } else { 1.0 };
        self.source.set_volume(self.volume * ramp);

        if !self.source.is_playing() {
            self.source.play()?;
        }
        Ok(())
    }

    pub fn set_ship_volume(&mut self, ship_volume: f32) {
        self.volume = effective_volume(self.config.volume(), ship_volume);
        self.source.set_volume(self.volume);
    }

    pub fn stop(&self) {
        self.source.stop();
    }

    pub fn status(&self) -> SoundStatus {
        SoundStatus::of("skid", self.source.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector2;

    use super::*;
    use crate::{
        adapter::{CapabilityProbe, FIRESPITTER},
        audio::mock,
        host::mock::{self as host, Collider, Hub, Registry},
    };

    fn setup() -> (Arc<Hub>, Arc<host::Damage>, WheelAdapter, Arc<mock::Source>, SkidSound) {
        let hub = Hub::new(Some(Collider::new(0.0)));
        let damage = host::Damage::new(false);
        let part = host::Part::new("rover")
            .with_wheel_base(host::WheelBase::new(Arc::clone(&hub)))
            .with_damage(Arc::clone(&damage));
        let adapter = WheelAdapter::with_probe(
            Some(&part),
            &Registry::new(),
            &CapabilityProbe::new(&FIRESPITTER),
        )
        .unwrap();

        let source = Arc::new(mock::Source::new("Sounds/skid", 1.0));
        let sound = SkidSound::start(
            Arc::clone(&source) as Arc<dyn Source>,
            &SkidConfig::new("Sounds/skid"),
            1.0,
        );
        (hub, damage, adapter, source, sound)
    }

    #[test]
    fn test_quiet_below_threshold() {
        let (hub, _damage, adapter, source, sound) = setup();
        assert!(source.is_looping());

        hub.set_tire_force(Some(Vector2::new(5.0, 300.0)));
        sound.update(&adapter).unwrap();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_volume_follows_lateral_force() {
        let (hub, _damage, adapter, source, sound) = setup();

        hub.set_tire_force(Some(Vector2::new(-50.0, 0.0)));
        sound.update(&adapter).unwrap();
        assert!(source.is_playing());
        assert!((source.volume() - 0.5).abs() < 1e-6);

        hub.set_tire_force(Some(Vector2::new(250.0, 0.0)));
        sound.update(&adapter).unwrap();
        assert_eq!(source.volume(), 1.0);
        assert_eq!(source.plays(), 1);

        hub.set_tire_force(None);
        sound.update(&adapter).unwrap();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_unsupported_part_is_quiet() {
        let (_hub, _damage, _adapter, source, sound) = setup();
        let unsupported = WheelAdapter::with_probe(
            Some(&host::Part::new("strut")),
            &Registry::new(),
            &CapabilityProbe::new(&FIRESPITTER),
        )
        .unwrap();

        source.play().unwrap();
        sound.update(&unsupported).unwrap();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_damaged_wheel_does_not_skid() {
        let (hub, damage, adapter, source, sound) = setup();

        hub.set_tire_force(Some(Vector2::new(80.0, 0.0)));
        damage.set_damaged(true);
        sound.update(&adapter).unwrap();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_ship_volume_scales_ramp() {
        let (hub, _damage, adapter, source, mut sound) = setup();

        sound.set_ship_volume(0.5);
        hub.set_tire_force(Some(Vector2::new(100.0, 0.0)));
        sound.update(&adapter).unwrap();
        assert_eq!(source.volume(), 0.5);
    }
}
