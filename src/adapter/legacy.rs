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

use super::probe::{CapabilityProbe, LegacyBindings};
use crate::host::{FieldInfo, Reflect, TypeRegistry, WheelCollider};

/// Adapts the legacy third-party wheel module through by-name field reads.
pub struct LegacyWheel {
    module: Arc<dyn Reflect>,
    bindings: Option<Arc<LegacyBindings>>,
    colliders: Vec<Arc<dyn WheelCollider>>,
}

impl LegacyWheel {
    /// Wraps a legacy module. The probe is consulted (and run, the first time) here;
    /// if it failed, the adapter is inert.
    pub fn new(
        module: Arc<dyn Reflect>,
        registry: &dyn TypeRegistry,
        probe: &CapabilityProbe,
    ) -> LegacyWheel {
        let bindings = probe.bindings(registry);
        let colliders = match &bindings {
            Some(bindings) => collect_colliders(module.as_ref(), bindings),
            None => Vec::new(),
        };

        LegacyWheel {
            module,
            bindings,
            colliders,
        }
    }

    /// Valid once the probe succeeded and at least one physical wheel was found.
    pub fn is_valid(&self) -> bool {
        self.bindings.is_some() && !self.colliders.is_empty()
    }

    pub fn has_motor(&self) -> bool {
        self.read_bool(|bindings| &bindings.has_motor)
    }

    pub fn motor_enabled(&self) -> bool {
        self.read_bool(|bindings| &bindings.motor_enabled)
    }

    /// The legacy module has no damage model.
    pub fn is_damaged(&self) -> bool {
        false
    }

    /// The physical wheels found at construction.
    pub fn colliders(&self) -> &[Arc<dyn WheelCollider>] {
        &self.colliders
    }

    /// The current rpm of each wheel, in construction order.
    pub fn wheel_rpms(&self) -> Vec<f32> {
        self.colliders.iter().map(|collider| collider.rpm()).collect()
    }

    /// Reads a boolean module field, or false if it doesn't read as a boolean.
    fn read_bool<F>(&self, field: F) -> bool
    where
        F: Fn(&LegacyBindings) -> &FieldInfo,
    {
        self.bindings
            .as_deref()
            .and_then(|bindings| self.module.get_value(field(bindings)).as_bool())
            .unwrap_or(false)
    }
}

/// Walks module -> wheel list -> wheel entries -> physical wheel. Anything of an
/// unexpected shape along the way contributes no wheels.
fn collect_colliders(
    module: &dyn Reflect,
    bindings: &LegacyBindings,
) -> Vec<Arc<dyn WheelCollider>> {
    let wheel_list = module.get_value(&bindings.wheel_list);
    let Some(wheel_list) = wheel_list.as_object() else {
        debug!(module = module.type_name(), "Wheel list is not an object");
        return Vec::new();
    };

    let wheels = wheel_list.get_value(&bindings.wheels);
    let Some(entries) = wheels.as_list() else {
        debug!(module = module.type_name(), "Wheels is not a list");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.as_object())
        .filter_map(|entry| entry.get_value(&bindings.wheel_collider).as_collider())
        .collect()
}
