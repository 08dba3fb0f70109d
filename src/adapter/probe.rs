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

//! One-time compatibility probe for the legacy wheel module.
//!
//! The legacy module's internals are not a stable contract. The layout we rely
//! on is written down in a [`LegacyLayout`] and resolved against the host's
//! type registry exactly once per [`CapabilityProbe`].

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::host::{FieldInfo, QualifiedName, TypeInfo, TypeRegistry, Visibility};

/// The names of the legacy wheel module's types and fields.
#[derive(Debug)]
pub struct LegacyLayout {
    /// The assembly that holds the legacy types.
    pub assembly: &'static str,
    /// The wheel module type. Parts are searched for a module with this name.
    pub module_type: &'static str,
    /// The wheel list container type.
    pub wheel_list_type: &'static str,
    /// The wheel entry type.
    pub wheel_class_type: &'static str,
    /// Module field: whether the wheel has a motor.
    pub has_motor: &'static str,
    /// Module field: whether the motor is enabled.
    pub motor_enabled: &'static str,
    /// Module field (private): the wheel list.
    pub wheel_list: &'static str,
    /// Wheel entry field: the physical wheel device.
    pub wheel_collider: &'static str,
    /// Wheel list field: the wheel entries.
    pub wheels: &'static str,
}

/// The layout of Firespitter's FSwheel.
pub static FIRESPITTER: LegacyLayout = LegacyLayout {
    assembly: "Firespitter",
    module_type: "FSwheel",
    wheel_list_type: "WheelList",
    wheel_class_type: "WheelClass",
    has_motor: "hasMotor",
    motor_enabled: "motorEnabled",
    wheel_list: "wheelList",
    wheel_collider: "wheelCollider",
    wheels: "wheels",
};

impl LegacyLayout {
    fn qualified(&self, type_name: &str) -> QualifiedName {
        QualifiedName::new(self.assembly, type_name)
    }
}

/// Field handles resolved by a successful probe.
#[derive(Debug)]
pub struct LegacyBindings {
    pub has_motor: FieldInfo,
    pub motor_enabled: FieldInfo,
    pub wheel_list: FieldInfo,
    pub wheels: FieldInfo,
    pub wheel_collider: FieldInfo,
}

/// Caches the outcome of resolving a [`LegacyLayout`]. The first call to
/// [`CapabilityProbe::bindings`] resolves; every later call returns the cached
/// outcome, including a failure.
pub struct CapabilityProbe {
    layout: &'static LegacyLayout,
    bindings: OnceLock<Option<Arc<LegacyBindings>>>,
}

impl CapabilityProbe {
    pub const fn new(layout: &'static LegacyLayout) -> CapabilityProbe {
        CapabilityProbe {
            layout,
            bindings: OnceLock::new(),
        }
    }

    pub fn layout(&self) -> &'static LegacyLayout {
        self.layout
    }

    /// Returns the resolved bindings, resolving against the registry on first use.
    pub fn bindings(&self, registry: &dyn TypeRegistry) -> Option<Arc<LegacyBindings>> {
        self.bindings
            .get_or_init(|| match resolve(self.layout, registry) {
                Some(bindings) => {
                    info!(
                        module = self.layout.module_type,
                        assembly = self.layout.assembly,
                        "Legacy wheel module is compatible"
                    );
                    Some(Arc::new(bindings))
                }
                None => {
                    warn!(
                        module = self.layout.module_type,
                        assembly = self.layout.assembly,
                        "Legacy wheel module is missing or incompatible, its wheels will be silent"
                    );
                    None
                }
            })
            .clone()
    }

    /// Whether the probe has run, and if so whether it succeeded.
    pub fn outcome(&self) -> Option<bool> {
        self.bindings.get().map(|bindings| bindings.is_some())
    }
}

/// The probe shared by every adapter built through [`super::WheelAdapter::new`].
pub(super) static PROCESS_PROBE: CapabilityProbe = CapabilityProbe::new(&FIRESPITTER);

fn resolve(layout: &LegacyLayout, registry: &dyn TypeRegistry) -> Option<LegacyBindings> {
    let module_type = resolve_type(layout, registry, layout.module_type)?;
    let wheel_list_type = resolve_type(layout, registry, layout.wheel_list_type)?;
    let wheel_class_type = resolve_type(layout, registry, layout.wheel_class_type)?;

    // The wheel list is private on the module, so search every instance field.
    let module_fields = module_type.fields(Visibility::Any);
    let module_field = |name: &str| {
        let field = module_fields.iter().find(|field| field.name() == name).cloned();
        if field.is_none() {
            debug!(owner = layout.module_type, field = name, "Field not found");
        }
        field
    };

    let has_motor = module_field(layout.has_motor)?;
    let motor_enabled = module_field(layout.motor_enabled)?;
    let wheel_list = module_field(layout.wheel_list)?;
    let wheel_collider = resolve_public_field(wheel_class_type.as_ref(), layout.wheel_collider)?;
    let wheels = resolve_public_field(wheel_list_type.as_ref(), layout.wheels)?;

    Some(LegacyBindings {
        has_motor,
        motor_enabled,
        wheel_list,
        wheels,
        wheel_collider,
    })
}

fn resolve_type(
    layout: &LegacyLayout,
    registry: &dyn TypeRegistry,
    type_name: &str,
) -> Option<Arc<dyn TypeInfo>> {
    let name = layout.qualified(type_name);
    let resolved = registry.resolve(&name);
    if resolved.is_none() {
        debug!(type_name = %name, "Type not found");
    }
    resolved
}

fn resolve_public_field(owner: &dyn TypeInfo, name: &str) -> Option<FieldInfo> {
    let field = owner.field(name, Visibility::Public);
    if field.is_none() {
        debug!(owner = owner.name(), field = name, "Public field not found");
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{Registry, Type};

    #[test]
    fn test_probe_resolves_compatible_layout() {
        let registry = Registry::compatible(&FIRESPITTER);
        let probe = CapabilityProbe::new(&FIRESPITTER);

        assert_eq!(probe.outcome(), None);
        let bindings = probe.bindings(&registry).expect("bindings");
        assert_eq!(probe.outcome(), Some(true));

        assert_eq!(bindings.wheel_list.name(), "wheelList");
        assert!(!bindings.wheel_list.is_public());
        assert_eq!(bindings.wheels.owner(), "WheelList");
        assert_eq!(bindings.wheel_collider.owner(), "WheelClass");
    }

    #[test]
    fn test_probe_fails_on_missing_types() {
        let registry = Registry::new();
        let probe = CapabilityProbe::new(&FIRESPITTER);

        assert!(probe.bindings(&registry).is_none());
        assert_eq!(probe.outcome(), Some(false));
        // Resolution stops at the first missing type.
        assert_eq!(registry.resolutions(), 1);
    }

    #[test]
    fn test_probe_fails_on_missing_private_field() {
        let registry = Registry::missing_fields(&FIRESPITTER);
        let probe = CapabilityProbe::new(&FIRESPITTER);

        assert!(probe.bindings(&registry).is_none());
        assert_eq!(registry.resolutions(), 3);
    }

    #[test]
    fn test_probe_requires_public_wheel_collider() {
        let registry = Registry::new()
            .with_type(
                "Firespitter",
                Type::new("FSwheel")
                    .with_field("hasMotor", true)
                    .with_field("motorEnabled", true)
                    .with_field("wheelList", false),
            )
            .with_type("Firespitter", Type::new("WheelList").with_field("wheels", true))
            .with_type(
                "Firespitter",
                Type::new("WheelClass").with_field("wheelCollider", false),
            );
        let probe = CapabilityProbe::new(&FIRESPITTER);

        assert!(probe.bindings(&registry).is_none());
    }

    #[test]
    fn test_probe_runs_once() {
        let registry = Registry::new();
        let probe = CapabilityProbe::new(&FIRESPITTER);

        for _ in 0..5 {
            assert!(probe.bindings(&registry).is_none());
        }
        assert_eq!(registry.resolutions(), 1);

        // A compatible registry showing up later doesn't revive a failed probe.
        let compatible = Registry::compatible(&FIRESPITTER);
        assert!(probe.bindings(&compatible).is_none());
        assert_eq!(compatible.resolutions(), 0);
    }

    #[test]
    fn test_probe_types_live_in_layout_assembly() {
        let registry = Registry::new()
            .with_type("SomethingElse", Type::new("FSwheel"))
            .with_type("SomethingElse", Type::new("WheelList"))
            .with_type("SomethingElse", Type::new("WheelClass"));
        let probe = CapabilityProbe::new(&FIRESPITTER);

        assert!(probe.bindings(&registry).is_none());
    }
}
