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

use rand::Rng;
use tracing::debug;

use super::{effective_volume, SoundError, SoundStatus};
use crate::{adapter::WheelAdapter, audio::Source, config::sounds::RollingConfig};

/// The looping rolling sound. Pitch and volume follow wheel rpm.
pub struct RollingSound {
    source: Arc<dyn Source>,
    config: RollingConfig,
    volume: f32,
}

impl RollingSound {
    /// Prepares the source: looping, at full effective volume, and seeked to a
    /// random point so that neighbouring wheels don't play in phase.
    pub fn start<R: Rng + ?Sized>(
        source: Arc<dyn Source>,
        config: &RollingConfig,
        ship_volume: f32,
        rng: &mut R,
    ) -> Result<RollingSound, SoundError> {
        let volume = effective_volume(config.volume(), ship_volume);
        source.set_looping(true);
        source.set_volume(volume);

        let length = source.clip_length();
        if length > 0.0 {
            let offset = rng.gen_range(0.0..length);
            debug!(clip = source.clip(), offset, "Rolling sound start offset");
            source.set_time(offset)?;
        }

        Ok(RollingSound {
            source,
            config: config.clone(),
            volume,
        })
    }

    /// Ticks the sound. Nothing an invalid adapter reports can be trusted, so
    /// it silences the sound.
    pub fn update(&self, adapter: &WheelAdapter) -> Result<(), SoundError> {
        if !adapter.is_valid() {
            self.source.stop();
            return Ok(());
        }

        let rpm = adapter.rpm();
        let driving = adapter.has_motor() && adapter.motor_enabled() && !adapter.is_damaged();
        if !driving || rpm <= self.config.min_rpm() {
            self.source.stop();
            return Ok(());
        }

        self.source
            .set_pitch((rpm.sqrt() / self.config.pitch_divisor()) as f32);

        let full_volume_rpm = self.config.full_volume_rpm();
        if rpm < full_volume_rpm {
            let ramp = (self.volume as f64 * rpm / full_volume_rpm) as f32;
            self.source.set_volume(ramp.max(self.config.min_volume()));
        } else {
            self.source.set_volume(self.volume);
        }

        if !self.source.is_playing() {
            self.source.play()?;
        }
        Ok(())
    }

    /// Applies a new ship volume.
    pub fn set_ship_volume(&mut self, ship_volume: f32) {
        self.volume = effective_volume(self.config.volume(), ship_volume);
        self.source.set_volume(self.volume);
    }

    pub fn stop(&self) {
        self.source.stop();
    }

    pub fn status(&self) -> SoundStatus {
        SoundStatus::of("rolling", self.source.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        adapter::{CapabilityProbe, FIRESPITTER},
        audio::mock,
        host::mock::{self as host, Collider, Hub, Motor, Registry},
    };

    struct Rover {
        part: host::Part,
        collider: Arc<Collider>,
        motor: Arc<Motor>,
        damage: Arc<host::Damage>,
    }

    fn rover(rpm: f32) -> Rover {
        let collider = Collider::new(0.0);
        collider.set_angular_velocity(rpm / 10.0);
        let motor = Motor::new(true);
        let damage = host::Damage::new(false);
        let part = host::Part::new("rover")
            .with_wheel_base(host::WheelBase::new(Hub::new(Some(Arc::clone(&collider)))))
            .with_motor(Arc::clone(&motor))
            .with_damage(Arc::clone(&damage));
        Rover {
            part,
            collider,
            motor,
            damage,
        }
    }

    fn adapter(part: &host::Part) -> WheelAdapter {
        let probe = CapabilityProbe::new(&FIRESPITTER);
        WheelAdapter::with_probe(Some(part), &Registry::new(), &probe).unwrap()
    }

    fn start(ship_volume: f32) -> (Arc<mock::Source>, RollingSound) {
        let source = Arc::new(mock::Source::new("Sounds/rover", 4.0));
        let mut rng = StdRng::seed_from_u64(7);
        let sound = RollingSound::start(
            Arc::clone(&source) as Arc<dyn Source>,
            &RollingConfig::new("Sounds/rover"),
            ship_volume,
            &mut rng,
        )
        .unwrap();
        (source, sound)
    }

    #[test]
    fn test_start_loops_and_seeks() {
        let (source, _sound) = start(0.5);
        assert!(source.is_looping());
        assert_eq!(source.volume(), 0.5);
        assert!((0.0..4.0).contains(&source.time()));
        assert!(!source.is_playing());
    }

    #[test]
    fn test_start_with_empty_clip_does_not_seek() {
        let source = Arc::new(mock::Source::new("Sounds/empty", 0.0));
        let mut rng = StdRng::seed_from_u64(7);
        RollingSound::start(
            Arc::clone(&source) as Arc<dyn Source>,
            &RollingConfig::new("Sounds/empty"),
            1.0,
            &mut rng,
        )
        .unwrap();
        assert_eq!(source.time(), 0.0);
    }

    #[test]
    fn test_full_speed() {
        let rover = rover(400.0);
        let (source, sound) = start(1.0);

        sound.update(&adapter(&rover.part)).unwrap();
        assert!(source.is_playing());
        assert_eq!(source.volume(), 1.0);
        assert!((source.pitch() - 20.0 / 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_volume_ramps_below_full_volume_rpm() {
        let rover = rover(50.0);
        let (source, sound) = start(0.8);

        sound.update(&adapter(&rover.part)).unwrap();
        assert!(source.is_playing());
        assert!((source.volume() - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_volume_restored_at_full_speed() {
        let rover = rover(50.0);
        let (source, sound) = start(0.8);
        let adapter = adapter(&rover.part);

        sound.update(&adapter).unwrap();
        assert!((source.volume() - 0.4).abs() < 1e-4);

        rover.collider.set_angular_velocity(25.0);
        sound.update(&adapter).unwrap();
        assert!((source.volume() - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_volume_floor() {
        let rover = rover(0.55);
        let (source, sound) = start(1.0);

        sound.update(&adapter(&rover.part)).unwrap();
        assert!(source.is_playing());
        assert_eq!(source.volume(), 0.006);
    }

    #[test]
    fn test_stops_at_threshold() {
        let rover = rover(200.0);
        let (source, sound) = start(1.0);
        let adapter = adapter(&rover.part);

        sound.update(&adapter).unwrap();
        assert!(source.is_playing());

        rover.collider.set_angular_velocity(0.01);
        sound.update(&adapter).unwrap();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_stops_when_motor_disabled_or_damaged() {
        let rover = rover(200.0);
        let (source, sound) = start(1.0);
        let adapter = adapter(&rover.part);

        rover.motor.set_enabled(false);
        sound.update(&adapter).unwrap();
        assert!(!source.is_playing());

        rover.motor.set_enabled(true);
        sound.update(&adapter).unwrap();
        assert!(source.is_playing());
        assert_eq!(source.plays(), 1);

        rover.damage.set_damaged(true);
        sound.update(&adapter).unwrap();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_keeps_playing_without_restarting() {
        let rover = rover(200.0);
        let (source, sound) = start(1.0);
        let adapter = adapter(&rover.part);

        for _ in 0..5 {
            sound.update(&adapter).unwrap();
        }
        assert_eq!(source.plays(), 1);
    }

    #[test]
    fn test_invalid_adapter_stops_sound() {
        let rover = rover(200.0);
        let (source, sound) = start(1.0);
        let adapter = adapter(&rover.part);
        sound.update(&adapter).unwrap();

        let unsupported = WheelAdapter::with_probe(
            Some(&host::Part::new("strut")),
            &Registry::new(),
            &CapabilityProbe::new(&FIRESPITTER),
        )
        .unwrap();
        sound.update(&unsupported).unwrap();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_retracted_wheel_goes_quiet() {
        let collider = Collider::new(0.0);
        collider.set_angular_velocity(20.0);
        let wheel_base = host::WheelBase::new(Hub::new(Some(collider)));
        let part = host::Part::new("rover")
            .with_wheel_base(Arc::clone(&wheel_base))
            .with_motor(Motor::new(true));
        let adapter = adapter(&part);
        let (source, sound) = start(1.0);

        sound.update(&adapter).unwrap();
        assert!(source.is_playing());

        wheel_base.set_deployed(false);
        sound.update(&adapter).unwrap();
        assert!(!source.is_playing());

        wheel_base.set_deployed(true);
        sound.update(&adapter).unwrap();
        assert!(source.is_playing());
    }

    #[test]
    fn test_legacy_wheels_average() {
        let registry = Registry::compatible(&FIRESPITTER);
        let probe = CapabilityProbe::new(&FIRESPITTER);
        let part = host::Part::new("fs-wheel").with_module(host::legacy_module(
            &FIRESPITTER,
            true,
            true,
            &[Some(Collider::new(30.0)), Some(Collider::new(-70.0))],
        ));
        let adapter = WheelAdapter::with_probe(Some(&part), &registry, &probe).unwrap();
        let (source, sound) = start(1.0);

        sound.update(&adapter).unwrap();
        assert!(source.is_playing());
        assert!((source.volume() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_ship_volume_change() {
        let rover = rover(200.0);
        let (source, mut sound) = start(1.0);

        sound.set_ship_volume(0.25);
        assert_eq!(source.volume(), 0.25);
        sound.update(&adapter(&rover.part)).unwrap();
        assert_eq!(source.volume(), 0.25);
    }

    #[test]
    fn test_playback_failure_propagates() {
        let rover = rover(200.0);
        let (source, sound) = start(1.0);
        source.fail_playback(true);

        let result = sound.update(&adapter(&rover.part));
        assert!(matches!(result, Err(SoundError::Audio(_))));
    }
}
