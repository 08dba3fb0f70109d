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
/// Error types for audio source operations
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio clip not found: {0}")]
    ClipNotFound(String),

    #[error("Playback failed for {clip}: {reason}")]
    Playback { clip: String, reason: String },

    #[error("Seek to {position}s is outside of {clip} ({length}s)")]
    Seek {
        clip: String,
        position: f32,
        length: f32,
    },
}
