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

//! Sounds driven by wheel and landing gear state.
//!
//! Each sound owns one audio source. [`PartSounds`] wires them to a part and
//! its wheel adapter and ticks them once per frame.

use std::{fmt, sync::Arc};

use tracing::{debug, error};

use crate::audio::{Library, Source};

mod damage;
mod error;
mod gear;
mod part;
mod rolling;
mod skid;

pub use damage::DamageSound;
pub use error::SoundError;
pub use gear::GearSound;
pub use part::{PartSounds, PartStatus};
pub use rolling::RollingSound;
pub use skid::SkidSound;

/// The volume a sound plays at once the game's ship volume is applied.
pub(crate) fn effective_volume(volume: f32, ship_volume: f32) -> f32 {
    volume * ship_volume
}

/// Creates a source for the given clip. Missing clips yield None so the sound
/// is skipped rather than failing the whole part.
pub(crate) fn load_source(
    library: &dyn Library,
    part: &str,
    clip: &str,
) -> Result<Option<Arc<dyn Source>>, SoundError> {
    if !library.exists(clip) {
        error!(part, clip, "Sound clip not found, the sound will be silent");
        return Ok(None);
    }
    let source = library.create_source(clip)?;
    debug!(part, %source, "Created sound source");
    Ok(Some(source))
}

/// A snapshot of one source.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundStatus {
    pub name: &'static str,
    pub playing: bool,
    pub volume: f32,
    pub pitch: f32,
}

impl SoundStatus {
    pub(crate) fn of(name: &'static str, source: &dyn Source) -> SoundStatus {
        SoundStatus {
            name,
            playing: source.is_playing(),
            volume: source.volume(),
            pitch: source.pitch(),
        }
    }
}

impl fmt::Display for SoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.playing {
            write!(
                f,
                "{}: playing (volume {:.3}, pitch {:.3})",
                self.name, self.volume, self.pitch
            )
        } else {
            write!(f, "{}: stopped", self.name)
        }
    }
}
