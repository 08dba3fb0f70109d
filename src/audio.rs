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
use std::{fmt, sync::Arc};

mod error;
pub mod mock;

pub use error::AudioError;

/// A positional audio source attached to a part, playing a single clip.
pub trait Source: fmt::Display + Send + Sync {
    /// The name of the clip this source plays.
    fn clip(&self) -> &str;

    /// The clip length in seconds.
    fn clip_length(&self) -> f32;

    /// Starts playback from the current position.
    fn play(&self) -> Result<(), AudioError>;

    /// Stops playback.
    fn stop(&self);

    fn is_playing(&self) -> bool;

    fn set_looping(&self, looping: bool);

    fn set_volume(&self, volume: f32);

    fn volume(&self) -> f32;

    fn set_pitch(&self, pitch: f32);

    fn pitch(&self) -> f32;

    /// Seeks to the given position in seconds.
    fn set_time(&self, seconds: f32) -> Result<(), AudioError>;

    fn time(&self) -> f32;
}

/// The host's clip database.
pub trait Library: Send + Sync {
    /// Returns true if a clip with the given name has been loaded.
    fn exists(&self, clip: &str) -> bool;

    /// Creates a new source playing the given clip.
    fn create_source(&self, clip: &str) -> Result<Arc<dyn Source>, AudioError>;
}
