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
use crate::{
    audio::Source,
    config::sounds::OneShotConfig,
    host::{GearState, LandingGear},
};

/// The landing gear motor sound, played when the gear starts moving.
pub struct GearSound {
    source: Arc<dyn Source>,
    config: OneShotConfig,
    previous: GearState,
}

impl GearSound {
    /// Prepares the source. The gear's current state is the baseline, so a
    /// move before the first update still plays.
    pub fn start(
        source: Arc<dyn Source>,
        config: &OneShotConfig,
        ship_volume: f32,
        gear: &dyn LandingGear,
    ) -> GearSound {
        source.set_looping(false);
        source.set_volume(effective_volume(config.volume(), ship_volume));
        GearSound {
            source,
            config: config.clone(),
            previous: gear.gear_state(),
        }
    }

    /// Compares the gear state against the last tick's. Retracting plays the
    /// clip from wherever it is; deploying plays it from the start. Nothing
    /// triggers while the clip is still playing, but the state is tracked
    /// regardless.
    pub fn update(&mut self, gear: &dyn LandingGear) -> Result<(), SoundError> {
        let current = gear.gear_state();
        let previous = std::mem::replace(&mut self.previous, current);

        if self.source.is_playing() {
            return Ok(());
        }

        match (previous, current) {
            (GearState::Deployed, GearState::Retracting | GearState::Retracted) => {
                debug!(clip = self.source.clip(), "Gear retracting");
                self.source.play()?;
            }
            (GearState::Retracted, GearState::Deploying | GearState::Deployed) => {
                debug!(clip = self.source.clip(), "Gear deploying");
                self.source.set_time(0.0)?;
                self.source.play()?;
            }
            _ => {}
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
        SoundStatus::of("gear", self.source.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::mock, host::mock as host};

    fn setup_in(state: GearState) -> (Arc<host::LandingGear>, Arc<mock::Source>, GearSound) {
        let gear = host::LandingGear::new(state);
        let source = Arc::new(mock::Source::new("Sounds/gear", 3.0));
        let sound = GearSound::start(
            Arc::clone(&source) as Arc<dyn Source>,
            &OneShotConfig::new("Sounds/gear"),
            1.0,
            gear.as_ref(),
        );
        (gear, source, sound)
    }

    fn setup() -> (Arc<host::LandingGear>, Arc<mock::Source>, GearSound) {
        setup_in(GearState::Deployed)
    }

    #[test]
    fn test_retract_before_first_update_plays() {
        let (gear, source, mut sound) = setup();

        gear.set_state(GearState::Retracting);
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 1);
    }

    #[test]
    fn test_steady_state_is_quiet() {
        let (gear, source, mut sound) = setup_in(GearState::Retracted);

        sound.update(gear.as_ref()).unwrap();
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 0);
    }

    #[test]
    fn test_retract_plays() {
        let (gear, source, mut sound) = setup();

        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 0);

        gear.set_state(GearState::Retracting);
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 1);
    }

    #[test]
    fn test_deploy_rewinds_and_plays() {
        let (gear, source, mut sound) = setup_in(GearState::Retracted);
        sound.update(gear.as_ref()).unwrap();

        source.set_time(2.5).unwrap();
        gear.set_state(GearState::Deploying);
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 1);
        assert_eq!(source.time(), 0.0);
    }

    #[test]
    fn test_no_retrigger_while_playing() {
        let (gear, source, mut sound) = setup();
        sound.update(gear.as_ref()).unwrap();

        gear.set_state(GearState::Retracting);
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 1);

        // Still playing: the full retract and the immediate redeploy are skipped.
        gear.set_state(GearState::Retracted);
        sound.update(gear.as_ref()).unwrap();
        gear.set_state(GearState::Deploying);
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 1);

        // The previous state kept moving, so finishing the deploy is not a transition.
        source.stop();
        gear.set_state(GearState::Deployed);
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 1);
    }

    #[test]
    fn test_broken_gear_is_quiet() {
        let (gear, source, mut sound) = setup();
        sound.update(gear.as_ref()).unwrap();

        gear.set_state(GearState::Broken);
        sound.update(gear.as_ref()).unwrap();
        gear.set_state(GearState::Retracted);
        sound.update(gear.as_ref()).unwrap();
        assert_eq!(source.plays(), 0);
    }
}
