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

//! A mock host. Parts and modules hold their state behind interior mutability so
//! a test or the simulator can change it between ticks.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use nalgebra::Vector2;
use parking_lot::Mutex;

use super::{FieldInfo, GearState, QualifiedName, Reflect, TypeInfo, Value, Visibility};
use crate::adapter::LegacyLayout;

/// A mock physical wheel device.
pub struct Collider {
    rpm: Mutex<f32>,
    angular_velocity: Mutex<f32>,
}

impl Collider {
    pub fn new(rpm: f32) -> Arc<Collider> {
        Arc::new(Collider {
            rpm: Mutex::new(rpm),
            angular_velocity: Mutex::new(rpm_to_angular_velocity(rpm)),
        })
    }

    /// Sets the rpm and keeps the angular velocity consistent with it.
    pub fn set_rpm(&self, rpm: f32) {
        *self.rpm.lock() = rpm;
        *self.angular_velocity.lock() = rpm_to_angular_velocity(rpm);
    }

    /// Sets the angular velocity and keeps the rpm consistent with it.
    pub fn set_angular_velocity(&self, angular_velocity: f32) {
        *self.angular_velocity.lock() = angular_velocity;
        *self.rpm.lock() = angular_velocity * 60.0 / std::f32::consts::TAU;
    }
}

fn rpm_to_angular_velocity(rpm: f32) -> f32 {
    rpm * std::f32::consts::TAU / 60.0
}

impl super::WheelCollider for Collider {
    fn rpm(&self) -> f32 {
        *self.rpm.lock()
    }

    fn angular_velocity(&self) -> f32 {
        *self.angular_velocity.lock()
    }
}

/// A mock deployed stock wheel.
pub struct Hub {
    collider: Option<Arc<Collider>>,
    tire_force: Mutex<Option<Vector2<f32>>>,
}

impl Hub {
    pub fn new(collider: Option<Arc<Collider>>) -> Arc<Hub> {
        Arc::new(Hub {
            collider,
            tire_force: Mutex::new(Some(Vector2::zeros())),
        })
    }

    pub fn collider(&self) -> Option<&Arc<Collider>> {
        self.collider.as_ref()
    }

    pub fn set_tire_force(&self, tire_force: Option<Vector2<f32>>) {
        *self.tire_force.lock() = tire_force;
    }
}

impl super::WheelHub for Hub {
    fn collider(&self) -> Option<Arc<dyn super::WheelCollider>> {
        self.collider
            .as_ref()
            .map(|collider| Arc::clone(collider) as Arc<dyn super::WheelCollider>)
    }

    fn tire_force(&self) -> Option<Vector2<f32>> {
        *self.tire_force.lock()
    }
}

/// A mock stock wheel base. The wheel can be retracted, which hides the hub.
pub struct WheelBase {
    hub: Arc<Hub>,
    deployed: AtomicBool,
}

impl WheelBase {
    pub fn new(hub: Arc<Hub>) -> Arc<WheelBase> {
        Arc::new(WheelBase {
            hub,
            deployed: AtomicBool::new(true),
        })
    }

    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    pub fn set_deployed(&self, deployed: bool) {
        self.deployed.store(deployed, Ordering::Relaxed);
    }
}

impl super::WheelBase for WheelBase {
    fn wheel(&self) -> Option<Arc<dyn super::WheelHub>> {
        if self.deployed.load(Ordering::Relaxed) {
            Some(Arc::clone(&self.hub) as Arc<dyn super::WheelHub>)
        } else {
            None
        }
    }
}

/// A mock motor module.
pub struct Motor {
    enabled: AtomicBool,
}

impl Motor {
    pub fn new(enabled: bool) -> Arc<Motor> {
        Arc::new(Motor {
            enabled: AtomicBool::new(enabled),
        })
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

impl super::WheelMotor for Motor {
    fn motor_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// A mock damage module.
pub struct Damage {
    damaged: AtomicBool,
}

impl Damage {
    pub fn new(damaged: bool) -> Arc<Damage> {
        Arc::new(Damage {
            damaged: AtomicBool::new(damaged),
        })
    }

    pub fn set_damaged(&self, damaged: bool) {
        self.damaged.store(damaged, Ordering::Relaxed);
    }
}

impl super::WheelDamage for Damage {
    fn is_damaged(&self) -> bool {
        self.damaged.load(Ordering::Relaxed)
    }
}

/// A mock landing gear module.
pub struct LandingGear {
    state: Mutex<GearState>,
}

impl LandingGear {
    pub fn new(state: GearState) -> Arc<LandingGear> {
        Arc::new(LandingGear {
            state: Mutex::new(state),
        })
    }

    pub fn set_state(&self, state: GearState) {
        *self.state.lock() = state;
    }
}

impl super::LandingGear for LandingGear {
    fn gear_state(&self) -> GearState {
        *self.state.lock()
    }
}

/// A mock part. Modules are attached with the `with_*` builders.
#[derive(Default)]
pub struct Part {
    name: String,
    wheel_base: Option<Arc<WheelBase>>,
    motor: Option<Arc<Motor>>,
    motor_steering: Option<Arc<Motor>>,
    damage: Option<Arc<Damage>>,
    landing_gear: Option<Arc<LandingGear>>,
    modules: HashMap<String, Arc<dyn Reflect>>,
}

impl Part {
    pub fn new(name: &str) -> Part {
        Part {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_wheel_base(mut self, wheel_base: Arc<WheelBase>) -> Part {
        self.wheel_base = Some(wheel_base);
        self
    }

    pub fn with_motor(mut self, motor: Arc<Motor>) -> Part {
        self.motor = Some(motor);
        self
    }

    pub fn with_motor_steering(mut self, motor: Arc<Motor>) -> Part {
        self.motor_steering = Some(motor);
        self
    }

    pub fn with_damage(mut self, damage: Arc<Damage>) -> Part {
        self.damage = Some(damage);
        self
    }

    pub fn with_landing_gear(mut self, landing_gear: Arc<LandingGear>) -> Part {
        self.landing_gear = Some(landing_gear);
        self
    }

    /// Attaches a module under its own type name.
    pub fn with_module(mut self, module: Arc<dyn Reflect>) -> Part {
        self.modules.insert(module.type_name().to_string(), module);
        self
    }
}

impl super::Part for Part {
    fn name(&self) -> &str {
        &self.name
    }

    fn wheel_base(&self) -> Option<Arc<dyn super::WheelBase>> {
        self.wheel_base
            .as_ref()
            .map(|module| Arc::clone(module) as Arc<dyn super::WheelBase>)
    }

    fn wheel_motor(&self) -> Option<Arc<dyn super::WheelMotor>> {
        self.motor
            .as_ref()
            .map(|module| Arc::clone(module) as Arc<dyn super::WheelMotor>)
    }

    fn wheel_motor_steering(&self) -> Option<Arc<dyn super::WheelMotor>> {
        self.motor_steering
            .as_ref()
            .map(|module| Arc::clone(module) as Arc<dyn super::WheelMotor>)
    }

    fn wheel_damage(&self) -> Option<Arc<dyn super::WheelDamage>> {
        self.damage
            .as_ref()
            .map(|module| Arc::clone(module) as Arc<dyn super::WheelDamage>)
    }

    fn landing_gear(&self) -> Option<Arc<dyn super::LandingGear>> {
        self.landing_gear
            .as_ref()
            .map(|module| Arc::clone(module) as Arc<dyn super::LandingGear>)
    }

    fn find_module(&self, type_name: &str) -> Option<Arc<dyn Reflect>> {
        self.modules.get(type_name).cloned()
    }
}

/// A mock object with named fields.
pub struct Object {
    type_name: String,
    fields: Mutex<HashMap<String, Value>>,
}

impl Object {
    pub fn new(type_name: &str) -> Object {
        Object {
            type_name: type_name.to_string(),
            fields: Mutex::new(HashMap::new()),
        }
    }

    pub fn with(self, name: &str, value: Value) -> Object {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: &str, value: Value) {
        self.fields.lock().insert(name.to_string(), value);
    }
}

impl Reflect for Object {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get_value(&self, field: &FieldInfo) -> Value {
        if field.owner() != self.type_name {
            return Value::Null;
        }
        self.fields
            .lock()
            .get(field.name())
            .cloned()
            .unwrap_or_default()
    }
}

/// Mock type metadata.
pub struct Type {
    name: String,
    fields: Vec<FieldInfo>,
}

impl Type {
    pub fn new(name: &str) -> Type {
        Type {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: &str, public: bool) -> Type {
        self.fields.push(FieldInfo::new(&self.name, name, public));
        self
    }
}

impl TypeInfo for Type {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self, visibility: Visibility) -> Vec<FieldInfo> {
        self.fields
            .iter()
            .filter(|field| field.visible(visibility))
            .cloned()
            .collect()
    }
}

/// A mock type registry that counts resolution attempts.
#[derive(Default)]
pub struct Registry {
    types: HashMap<QualifiedName, Arc<Type>>,
    resolutions: AtomicUsize,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn with_type(mut self, assembly: &str, info: Type) -> Registry {
        self.types
            .insert(QualifiedName::new(assembly, &info.name), Arc::new(info));
        self
    }

    /// The number of times any type has been resolved through this registry.
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    /// A registry exposing the given legacy layout in full.
    pub fn compatible(layout: &LegacyLayout) -> Registry {
        Registry::new()
            .with_type(
                layout.assembly,
                Type::new(layout.module_type)
                    .with_field(layout.has_motor, true)
                    .with_field(layout.motor_enabled, true)
                    .with_field(layout.wheel_list, false),
            )
            .with_type(
                layout.assembly,
                Type::new(layout.wheel_list_type).with_field(layout.wheels, true),
            )
            .with_type(
                layout.assembly,
                Type::new(layout.wheel_class_type).with_field(layout.wheel_collider, true),
            )
    }

    /// A registry where the legacy types resolve, but the module lacks its wheel list.
    pub fn missing_fields(layout: &LegacyLayout) -> Registry {
        Registry::new()
            .with_type(
                layout.assembly,
                Type::new(layout.module_type)
                    .with_field(layout.has_motor, true)
                    .with_field(layout.motor_enabled, true),
            )
            .with_type(
                layout.assembly,
                Type::new(layout.wheel_list_type).with_field(layout.wheels, true),
            )
            .with_type(
                layout.assembly,
                Type::new(layout.wheel_class_type).with_field(layout.wheel_collider, true),
            )
    }
}

impl super::TypeRegistry for Registry {
    fn resolve(&self, name: &QualifiedName) -> Option<Arc<dyn TypeInfo>> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        self.types
            .get(name)
            .map(|info| Arc::clone(info) as Arc<dyn TypeInfo>)
    }
}

/// Builds a legacy wheel module with one wheel entry per element of `colliders`.
/// Entries with no collider model wheels whose physics device is missing.
pub fn legacy_module(
    layout: &LegacyLayout,
    has_motor: bool,
    motor_enabled: bool,
    colliders: &[Option<Arc<Collider>>],
) -> Arc<Object> {
    let entries = colliders
        .iter()
        .map(|collider| {
            let value = match collider {
                Some(collider) => Value::Collider(Arc::clone(collider) as _),
                None => Value::Null,
            };
            Value::Object(Arc::new(
                Object::new(layout.wheel_class_type).with(layout.wheel_collider, value),
            ))
        })
        .collect();

    let wheel_list = Object::new(layout.wheel_list_type).with(layout.wheels, Value::List(entries));

    Arc::new(
        Object::new(layout.module_type)
            .with(layout.has_motor, Value::Bool(has_motor))
            .with(layout.motor_enabled, Value::Bool(motor_enabled))
            .with(layout.wheel_list, Value::Object(Arc::new(wheel_list))),
    )
}
