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

//! The host simulation's object model, as seen by the wheel adapter.
//!
//! Stock wheel modules are reached through the statically typed traits here.
//! Third-party modules the host can only describe by name are reached through
//! the reflection surface in [`reflect`].

use std::{fmt, sync::Arc};

use nalgebra::Vector2;
use serde::Deserialize;

pub mod mock;
mod reflect;

pub use reflect::{FieldInfo, QualifiedName, Reflect, TypeInfo, TypeRegistry, Value, Visibility};

/// The physical wheel device (collider).
pub trait WheelCollider: Send + Sync {
    /// Rotational speed in revolutions per minute.
    fn rpm(&self) -> f32;

    /// Angular velocity in radians per second.
    fn angular_velocity(&self) -> f32;
}

/// A deployed stock wheel.
pub trait WheelHub: Send + Sync {
    /// The physical device backing this wheel, if the physics side exists.
    fn collider(&self) -> Option<Arc<dyn WheelCollider>>;

    /// The tire force of the first wheel state: x is lateral, y is longitudinal.
    fn tire_force(&self) -> Option<Vector2<f32>>;
}

/// The stock wheel base module.
pub trait WheelBase: Send + Sync {
    /// The live wheel. None while the wheel is retracted or destroyed.
    fn wheel(&self) -> Option<Arc<dyn WheelHub>>;
}

/// A stock motor module. Both the plain and the steering motor expose this.
pub trait WheelMotor: Send + Sync {
    fn motor_enabled(&self) -> bool;
}

/// The stock wheel damage module.
pub trait WheelDamage: Send + Sync {
    fn is_damaged(&self) -> bool;
}

/// Landing gear deployment states.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GearState {
    Retracted,
    Deploying,
    Deployed,
    Retracting,
    Broken,
}

impl fmt::Display for GearState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            GearState::Retracted => "retracted",
            GearState::Deploying => "deploying",
            GearState::Deployed => "deployed",
            GearState::Retracting => "retracting",
            GearState::Broken => "broken",
        };
        write!(f, "{}", state)
    }
}

/// A landing gear module.
pub trait LandingGear: Send + Sync {
    fn gear_state(&self) -> GearState;
}

/// A vehicle part, which hosts zero or more modules.
pub trait Part: Send + Sync {
    /// The part's display name.
    fn name(&self) -> &str;

    /// Finds the attached stock wheel base module.
    fn wheel_base(&self) -> Option<Arc<dyn WheelBase>>;

    /// Finds the attached stock motor module.
    fn wheel_motor(&self) -> Option<Arc<dyn WheelMotor>>;

    /// Finds the attached stock motor/steering module.
    fn wheel_motor_steering(&self) -> Option<Arc<dyn WheelMotor>>;

    /// Finds the attached stock damage module.
    fn wheel_damage(&self) -> Option<Arc<dyn WheelDamage>>;

    /// Finds the attached landing gear module.
    fn landing_gear(&self) -> Option<Arc<dyn LandingGear>>;

    /// Finds an attached module by its runtime type name.
    fn find_module(&self, type_name: &str) -> Option<Arc<dyn Reflect>>;
}
