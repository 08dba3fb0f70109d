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

//! Normalized access to whichever wheel module a part carries.
//!
//! Two backends exist:
//! - the host's stock wheel module family, accessed through typed traits, and
//! - a legacy third-party wheel module, accessed by name after a one-time
//!   [`CapabilityProbe`].
//!
//! Parts with neither get an [`WheelAdapter::Unsupported`] adapter. Every read
//! on every backend is infallible: missing or oddly shaped host state reads as
//! false, zero or empty.

use std::{fmt, sync::Arc};

use nalgebra::Vector2;
use tracing::debug;

use crate::host::{Part, TypeRegistry, WheelCollider};

mod error;
mod legacy;
mod probe;
mod stock;

pub use error::AdapterError;
pub use legacy::LegacyWheel;
pub use probe::{CapabilityProbe, LegacyBindings, LegacyLayout, FIRESPITTER};
pub use stock::StockWheel;

/// Which backend an adapter uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    Stock,
    Legacy,
    Unsupported,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            AdapterKind::Stock => "stock",
            AdapterKind::Legacy => "legacy",
            AdapterKind::Unsupported => "unsupported",
        };
        write!(f, "{}", kind)
    }
}

/// Rotational speed as the backend reports it.
#[derive(Clone, Debug, PartialEq)]
pub enum RotationalSpeed {
    /// A single figure for the whole part.
    Aggregate(f64),
    /// One rpm reading per physical wheel.
    PerWheel(Vec<f32>),
}

impl RotationalSpeed {
    /// Collapses to a single rpm. Per-wheel readings average their magnitudes.
    pub fn rpm(&self) -> f64 {
        match self {
            RotationalSpeed::Aggregate(rpm) => *rpm,
            RotationalSpeed::PerWheel(rpms) => {
                if rpms.is_empty() {
                    return 0.0;
                }
                let total: f64 = rpms.iter().map(|rpm| rpm.abs() as f64).sum();
                total / rpms.len() as f64
            }
        }
    }
}

/// The wheel capability surface for a single part.
pub enum WheelAdapter {
    Stock(StockWheel),
    Legacy(LegacyWheel),
    Unsupported,
}

impl WheelAdapter {
    /// Builds the adapter for a part using the process-wide legacy probe.
    pub fn new(
        part: Option<&dyn Part>,
        registry: &dyn TypeRegistry,
    ) -> Result<WheelAdapter, AdapterError> {
        WheelAdapter::with_probe(part, registry, &probe::PROCESS_PROBE)
    }

    /// Builds the adapter for a part using the given legacy probe.
    pub fn with_probe(
        part: Option<&dyn Part>,
        registry: &dyn TypeRegistry,
        probe: &CapabilityProbe,
    ) -> Result<WheelAdapter, AdapterError> {
        let Some(part) = part else {
            return Err(AdapterError::InvalidArgument("part"));
        };

        let adapter = if let Some(base) = part.wheel_base() {
            WheelAdapter::Stock(StockWheel::new(part, base))
        } else if let Some(module) = part.find_module(probe.layout().module_type) {
            WheelAdapter::Legacy(LegacyWheel::new(module, registry, probe))
        } else {
            WheelAdapter::Unsupported
        };

        debug!(
            part = part.name(),
            kind = %adapter.kind(),
            valid = adapter.is_valid(),
            "Wheel adapter created"
        );
        Ok(adapter)
    }

    pub fn kind(&self) -> AdapterKind {
        match self {
            WheelAdapter::Stock(_) => AdapterKind::Stock,
            WheelAdapter::Legacy(_) => AdapterKind::Legacy,
            WheelAdapter::Unsupported => AdapterKind::Unsupported,
        }
    }

    /// Gate for everything else: other reads are only meaningful when this is true.
    pub fn is_valid(&self) -> bool {
        match self {
            WheelAdapter::Stock(wheel) => wheel.is_valid(),
            WheelAdapter::Legacy(wheel) => wheel.is_valid(),
            WheelAdapter::Unsupported => false,
        }
    }

    pub fn has_motor(&self) -> bool {
        match self {
            WheelAdapter::Stock(wheel) => wheel.has_motor(),
            WheelAdapter::Legacy(wheel) => wheel.has_motor(),
            WheelAdapter::Unsupported => false,
        }
    }

    pub fn motor_enabled(&self) -> bool {
        match self {
            WheelAdapter::Stock(wheel) => wheel.motor_enabled(),
            WheelAdapter::Legacy(wheel) => wheel.motor_enabled(),
            WheelAdapter::Unsupported => false,
        }
    }

    pub fn is_damaged(&self) -> bool {
        match self {
            WheelAdapter::Stock(wheel) => wheel.is_damaged(),
            WheelAdapter::Legacy(wheel) => wheel.is_damaged(),
            WheelAdapter::Unsupported => false,
        }
    }

    pub fn rotational_speed(&self) -> RotationalSpeed {
        match self {
            WheelAdapter::Stock(wheel) => RotationalSpeed::Aggregate(wheel.rpm()),
            WheelAdapter::Legacy(wheel) => RotationalSpeed::PerWheel(wheel.wheel_rpms()),
            WheelAdapter::Unsupported => RotationalSpeed::PerWheel(Vec::new()),
        }
    }

    /// A single rpm figure regardless of backend.
    pub fn rpm(&self) -> f64 {
        self.rotational_speed().rpm()
    }

    /// Tire force, lateral in x and longitudinal in y. Only the stock backend
    /// reports it; the others read zero.
    pub fn tire_force(&self) -> Vector2<f32> {
        match self {
            WheelAdapter::Stock(wheel) => wheel.tire_force(),
            WheelAdapter::Legacy(_) | WheelAdapter::Unsupported => Vector2::zeros(),
        }
    }

    /// The physical wheels. Only the legacy backend collects them.
    pub fn wheels(&self) -> &[Arc<dyn WheelCollider>] {
        match self {
            WheelAdapter::Legacy(wheel) => wheel.colliders(),
            WheelAdapter::Stock(_) | WheelAdapter::Unsupported => &[],
        }
    }
}

impl fmt::Debug for WheelAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WheelAdapter")
            .field("kind", &self.kind())
            .field("valid", &self.is_valid())
            .finish()
    }
}
