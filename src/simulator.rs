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

//! Drives part sounds against mock hardware from a scripted scenario.

use std::sync::Arc;

use nalgebra::Vector2;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, span, Level};

use crate::{
    adapter::{AdapterError, AdapterKind, CapabilityProbe, WheelAdapter, FIRESPITTER},
    audio::mock as audio,
    config::{
        scenario::{LegacyLayoutKind, PartDefinition, PartKind, Telemetry},
        Scenario,
    },
    host::{
        mock::{self as host, Collider, Hub, Motor, Registry},
        GearState, Value,
    },
    sounds::{PartSounds, PartStatus},
};

/// Handles onto the mock modules of a simulated part.
struct Hardware {
    colliders: Vec<Arc<Collider>>,
    wheel_base: Option<Arc<host::WheelBase>>,
    motors: Vec<Arc<Motor>>,
    damage: Option<Arc<host::Damage>>,
    landing_gear: Option<Arc<host::LandingGear>>,
    legacy_module: Option<Arc<host::Object>>,
}

impl Hardware {
    fn build(definition: &PartDefinition) -> (host::Part, Hardware) {
        let mut part = host::Part::new(definition.name());
        let mut hardware = Hardware {
            colliders: Vec::new(),
            wheel_base: None,
            motors: Vec::new(),
            damage: None,
            landing_gear: None,
            legacy_module: None,
        };

        match definition.kind() {
            PartKind::Stock | PartKind::Gear => {
                let collider = Collider::new(0.0);
                let wheel_base = host::WheelBase::new(Hub::new(Some(Arc::clone(&collider))));
                part = part.with_wheel_base(Arc::clone(&wheel_base));
                hardware.colliders.push(collider);
                hardware.wheel_base = Some(wheel_base);

                if definition.motor() {
                    let motor = Motor::new(true);
                    part = part.with_motor(Arc::clone(&motor));
                    hardware.motors.push(motor);
                }
                if definition.steering_motor() {
                    let motor = Motor::new(true);
                    part = part.with_motor_steering(Arc::clone(&motor));
                    hardware.motors.push(motor);
                }
                if definition.damageable() {
                    let damage = host::Damage::new(false);
                    part = part.with_damage(Arc::clone(&damage));
                    hardware.damage = Some(damage);
                }
                if definition.kind() == PartKind::Gear {
                    let gear = host::LandingGear::new(GearState::Deployed);
                    part = part.with_landing_gear(Arc::clone(&gear));
                    hardware.landing_gear = Some(gear);
                }
            }
            PartKind::Legacy => {
                let present = definition
                    .wheels()
                    .saturating_sub(definition.missing_colliders());
                let colliders: Vec<Option<Arc<Collider>>> = (0..definition.wheels())
                    .map(|i| (i < present).then(|| Collider::new(0.0)))
                    .collect();
                hardware.colliders = colliders.iter().flatten().cloned().collect();

                let module = host::legacy_module(&FIRESPITTER, definition.motor(), true, &colliders);
                part = part.with_module(Arc::clone(&module) as _);
                hardware.legacy_module = Some(module);
            }
            PartKind::Bare => {}
        }

        (part, hardware)
    }

    fn apply(&self, telemetry: &Telemetry) {
        if let Some(rpm) = telemetry.rpm {
            for collider in &self.colliders {
                if self.wheel_base.is_some() {
                    // Stock wheels report rpm from angular velocity.
                    collider.set_angular_velocity(rpm / 10.0);
                } else {
                    collider.set_rpm(rpm);
                }
            }
        }
        if let (Some([lateral, longitudinal]), Some(wheel_base)) =
            (telemetry.tire_force, &self.wheel_base)
        {
            wheel_base
                .hub()
                .set_tire_force(Some(Vector2::new(lateral, longitudinal)));
        }
        if let Some(enabled) = telemetry.motor_enabled {
            for motor in &self.motors {
                motor.set_enabled(enabled);
            }
            if let Some(module) = &self.legacy_module {
                module.set(FIRESPITTER.motor_enabled, Value::Bool(enabled));
            }
        }
        if let (Some(damaged), Some(damage)) = (telemetry.damaged, &self.damage) {
            damage.set_damaged(damaged);
        }
        if let (Some(deployed), Some(wheel_base)) = (telemetry.deployed, &self.wheel_base) {
            wheel_base.set_deployed(deployed);
        }
        if let (Some(state), Some(gear)) = (telemetry.gear, &self.landing_gear) {
            gear.set_state(state);
        }
    }
}

fn registry_for(layout: LegacyLayoutKind) -> Registry {
    match layout {
        LegacyLayoutKind::Compatible => Registry::compatible(&FIRESPITTER),
        LegacyLayoutKind::MissingTypes => Registry::new(),
        LegacyLayoutKind::MissingFields => Registry::missing_fields(&FIRESPITTER),
    }
}

struct SimulatedPart {
    name: String,
    hardware: Hardware,
    sounds: PartSounds,
}

/// The state of every part after a scenario step.
#[derive(Clone, Debug)]
pub struct Frame {
    /// The number of ticks simulated so far.
    pub tick: u64,
    pub paused: bool,
    pub parts: Vec<PartStatus>,
}

impl Frame {
    pub fn part(&self, name: &str) -> Option<&PartStatus> {
        self.parts.iter().find(|part| part.part == name)
    }
}

/// Runs a scenario's parts through its ticks.
pub struct Simulator {
    scenario: Scenario,
    parts: Vec<SimulatedPart>,
    paused: bool,
    ship_volume: f32,
    tick: u64,
}

impl Simulator {
    /// Builds the scenario's parts and attaches their sounds. The seed fixes the
    /// rolling sounds' start offsets.
    pub fn new(scenario: Scenario, seed: Option<u64>) -> Simulator {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let registry = Arc::new(registry_for(scenario.legacy_layout()));
        let library = scenario
            .clips()
            .into_iter()
            .fold(audio::Library::new(), |library, (clip, length)| {
                library.with_clip(&clip, length)
            });
        let probe = Arc::new(CapabilityProbe::new(&FIRESPITTER));

        let parts = scenario
            .parts()
            .iter()
            .map(|definition| {
                let (part, hardware) = Hardware::build(definition);
                let sounds = PartSounds::start(
                    Arc::new(part),
                    Arc::clone(&registry) as _,
                    &library,
                    scenario.sounds(),
                    &mut rng,
                    Some(Arc::clone(&probe)),
                );
                SimulatedPart {
                    name: definition.name().to_string(),
                    hardware,
                    sounds,
                }
            })
            .collect();

        let ship_volume = scenario.sounds().ship_volume();
        Simulator {
            scenario,
            parts,
            paused: false,
            ship_volume,
            tick: 0,
        }
    }

    /// Runs every step of the scenario, returning a frame per step.
    pub fn run(&mut self) -> Vec<Frame> {
        let ticks = self.scenario.ticks().to_vec();
        let mut frames = Vec::with_capacity(ticks.len());

        for (step, tick) in ticks.iter().enumerate() {
            let span = span!(Level::INFO, "step", step);
            let _enter = span.enter();

            if let Some(ship_volume) = tick.ship_volume() {
                self.ship_volume = ship_volume.max(0.0);
            }
            match tick.paused() {
                Some(true) if !self.paused => {
                    info!("Game paused");
                    self.paused = true;
                    self.parts.iter_mut().for_each(|part| part.sounds.on_pause());
                }
                Some(false) if self.paused => {
                    info!(ship_volume = self.ship_volume, "Game unpaused");
                    self.paused = false;
                    let ship_volume = self.ship_volume;
                    self.parts
                        .iter_mut()
                        .for_each(|part| part.sounds.on_unpause(ship_volume));
                }
                _ => {}
            }

            for part in &self.parts {
                if let Some(telemetry) = tick.telemetry(&part.name) {
                    debug!(part = %part.name, ?telemetry, "Applying telemetry");
                    part.hardware.apply(telemetry);
                }
            }

            for _ in 0..tick.repeat() {
                self.parts.iter_mut().for_each(|part| part.sounds.update());
                self.tick += 1;
            }

            frames.push(self.frame());
        }

        frames
    }

    fn frame(&self) -> Frame {
        Frame {
            tick: self.tick,
            paused: self.paused,
            parts: self.parts.iter().map(|part| part.sounds.status()).collect(),
        }
    }
}

/// What the wheel adapter makes of a part.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeReport {
    pub part: String,
    pub kind: AdapterKind,
    pub valid: bool,
    pub has_motor: bool,
    pub wheels: usize,
}

/// Builds an adapter for every part in the scenario without running it. The
/// second value is the legacy capability probe's outcome, if it ran.
pub fn probe(scenario: &Scenario) -> Result<(Vec<ProbeReport>, Option<bool>), AdapterError> {
    let registry = registry_for(scenario.legacy_layout());
    let probe = CapabilityProbe::new(&FIRESPITTER);

    let reports = scenario
        .parts()
        .iter()
        .map(|definition| {
            let (part, _hardware) = Hardware::build(definition);
            let adapter = WheelAdapter::with_probe(Some(&part), &registry, &probe)?;
            Ok(ProbeReport {
                part: definition.name().to_string(),
                kind: adapter.kind(),
                valid: adapter.is_valid(),
                has_motor: adapter.has_motor(),
                wheels: adapter.wheels().len(),
            })
        })
        .collect::<Result<Vec<_>, AdapterError>>()?;

    Ok((reports, probe.outcome()))
}
