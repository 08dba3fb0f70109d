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

use nalgebra::Vector2;

use crate::host::{Part, WheelBase, WheelDamage, WheelMotor};

/// The stock collider reports angular velocity; scaling it by ten is close enough
/// to rpm for pitch and volume purposes.
const ANGULAR_VELOCITY_TO_RPM: f64 = 10.0;

/// Adapts the host's stock wheel module family.
pub struct StockWheel {
    base: Arc<dyn WheelBase>,
    motor: Option<Arc<dyn WheelMotor>>,
    motor_steering: Option<Arc<dyn WheelMotor>>,
    damage: Option<Arc<dyn WheelDamage>>,
}

impl StockWheel {
    /// Gathers the stock wheel modules attached to the part alongside its wheel base.
    pub fn new(part: &dyn Part, base: Arc<dyn WheelBase>) -> StockWheel {
        StockWheel {
            base,
            motor: part.wheel_motor(),
            motor_steering: part.wheel_motor_steering(),
            damage: part.wheel_damage(),
        }
    }

    /// Valid while the wheel exists, i.e. it isn't retracted or destroyed.
    pub fn is_valid(&self) -> bool {
        self.base.wheel().is_some()
    }

    pub fn has_motor(&self) -> bool {
        self.motor.is_some() || self.motor_steering.is_some()
    }

    pub fn motor_enabled(&self) -> bool {
        match (&self.motor, &self.motor_steering) {
            (Some(motor), _) => motor.motor_enabled(),
            (None, Some(motor)) => motor.motor_enabled(),
            (None, None) => false,
        }
    }

    pub fn is_damaged(&self) -> bool {
        self.damage
            .as_ref()
            .is_some_and(|damage| damage.is_damaged())
    }

    /// Aggregate rotational speed. Zero if the wheel or its collider is gone.
    pub fn rpm(&self) -> f64 {
        self.base
            .wheel()
            .and_then(|wheel| wheel.collider())
            .map(|collider| collider.angular_velocity() as f64 * ANGULAR_VELOCITY_TO_RPM)
            .unwrap_or(0.0)
    }

    /// Tire force, lateral in x and longitudinal in y. Zero if the wheel is gone.
    pub fn tire_force(&self) -> Vector2<f32> {
        self.base
            .wheel()
            .and_then(|wheel| wheel.tire_force())
            .unwrap_or_else(Vector2::zeros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock;

    fn stock_part(
        motor: Option<Arc<mock::Motor>>,
        motor_steering: Option<Arc<mock::Motor>>,
        damage: Option<Arc<mock::Damage>>,
    ) -> (mock::Part, Arc<mock::WheelBase>) {
        let base = mock::WheelBase::new(mock::Hub::new(Some(mock::Collider::new(0.0))));
        let mut part = mock::Part::new("wheel").with_wheel_base(base.clone());
        if let Some(motor) = motor {
            part = part.with_motor(motor);
        }
        if let Some(motor) = motor_steering {
            part = part.with_motor_steering(motor);
        }
        if let Some(damage) = damage {
            part = part.with_damage(damage);
        }
        (part, base)
    }

    #[test]
    fn test_motor_flags() {
        let (part, base) = stock_part(None, None, None);
        let wheel = StockWheel::new(&part, base);
        assert!(!wheel.has_motor());
        assert!(!wheel.motor_enabled());

        let (part, base) = stock_part(None, Some(mock::Motor::new(true)), None);
        let wheel = StockWheel::new(&part, base);
        assert!(wheel.has_motor());
        assert!(wheel.motor_enabled());

        // The plain motor wins over the steering motor.
        let (part, base) = stock_part(
            Some(mock::Motor::new(false)),
            Some(mock::Motor::new(true)),
            None,
        );
        let wheel = StockWheel::new(&part, base);
        assert!(wheel.has_motor());
        assert!(!wheel.motor_enabled());
    }

    #[test]
    fn test_damage_delegates() {
        let (part, base) = stock_part(None, None, None);
        assert!(!StockWheel::new(&part, base).is_damaged());

        let damage = mock::Damage::new(false);
        let (part, base) = stock_part(None, None, Some(damage.clone()));
        let wheel = StockWheel::new(&part, base);
        assert!(!wheel.is_damaged());
        damage.set_damaged(true);
        assert!(wheel.is_damaged());
    }

    #[test]
    fn test_rpm_scales_angular_velocity() {
        let (part, base) = stock_part(None, None, None);
        let wheel = StockWheel::new(&part, base.clone());

        base.hub()
            .collider()
            .expect("collider")
            .set_angular_velocity(4.5);
        assert!((wheel.rpm() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_retracted_wheel_reads_zero() {
        let (part, base) = stock_part(None, None, None);
        let wheel = StockWheel::new(&part, base.clone());
        base.hub()
            .collider()
            .expect("collider")
            .set_angular_velocity(12.0);
        base.hub().set_tire_force(Some(Vector2::new(30.0, -5.0)));
        assert!(wheel.is_valid());

        base.set_deployed(false);
        assert!(!wheel.is_valid());
        assert_eq!(wheel.rpm(), 0.0);
        assert_eq!(wheel.tire_force(), Vector2::zeros());

        base.set_deployed(true);
        assert_eq!(wheel.tire_force(), Vector2::new(30.0, -5.0));
    }

    #[test]
    fn test_missing_wheel_state_reads_zero() {
        let base = mock::WheelBase::new(mock::Hub::new(None));
        let part = mock::Part::new("wheel").with_wheel_base(base.clone());
        base.hub().set_tire_force(None);

        let wheel = StockWheel::new(&part, base);
        assert_eq!(wheel.rpm(), 0.0);
        assert_eq!(wheel.tire_force(), Vector2::zeros());
    }
}
