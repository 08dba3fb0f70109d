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
use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use tracing::debug;

use super::AudioError;

/// A mock source. Doesn't actually play anything, but tracks what it was told.
pub struct Source {
    clip: String,
    length: f32,
    playing: AtomicBool,
    looping: AtomicBool,
    volume: Mutex<f32>,
    pitch: Mutex<f32>,
    time: Mutex<f32>,
    plays: AtomicUsize,
    fail_playback: AtomicBool,
}

impl Source {
    pub fn new(clip: &str, length: f32) -> Source {
        Source {
            clip: clip.to_string(),
            length,
            playing: AtomicBool::new(false),
            looping: AtomicBool::new(false),
            volume: Mutex::new(1.0),
            pitch: Mutex::new(1.0),
            time: Mutex::new(0.0),
            plays: AtomicUsize::new(0),
            fail_playback: AtomicBool::new(false),
        }
    }

    /// The number of times playback has been started.
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::Relaxed)
    }

    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Relaxed)
    }

    /// Makes every following play fail.
    pub fn fail_playback(&self, fail: bool) {
        self.fail_playback.store(fail, Ordering::Relaxed);
    }
}

impl super::Source for Source {
    fn clip(&self) -> &str {
        &self.clip
    }

    fn clip_length(&self) -> f32 {
        self.length
    }

    fn play(&self) -> Result<(), AudioError> {
        if self.fail_playback.load(Ordering::Relaxed) {
            return Err(AudioError::Playback {
                clip: self.clip.clone(),
                reason: "mock failure".to_string(),
            });
        }
        debug!(clip = self.clip, "Playing clip (mock)");
        self.plays.fetch_add(1, Ordering::Relaxed);
        self.playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&self) {
        self.playing.store(false, Ordering::Relaxed);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::Relaxed);
    }

    fn set_volume(&self, volume: f32) {
        *self.volume.lock() = volume;
    }

    fn volume(&self) -> f32 {
        *self.volume.lock()
    }

    fn set_pitch(&self, pitch: f32) {
        *self.pitch.lock() = pitch;
    }

    fn pitch(&self) -> f32 {
        *self.pitch.lock()
    }

    fn set_time(&self, seconds: f32) -> Result<(), AudioError> {
        if !(0.0..=self.length).contains(&seconds) {
            return Err(AudioError::Seek {
                clip: self.clip.clone(),
                position: seconds,
                length: self.length,
            });
        }
        *self.time.lock() = seconds;
        Ok(())
    }

    fn time(&self) -> f32 {
        *self.time.lock()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.clip)
    }
}

/// A mock clip library. Remembers every source it hands out.
#[derive(Default)]
pub struct Library {
    clips: HashMap<String, f32>,
    sources: Mutex<Vec<Arc<Source>>>,
    fail_create: Mutex<HashSet<String>>,
}

impl Library {
    pub fn new() -> Library {
        Library::default()
    }

    /// Registers a clip with the given length in seconds.
    pub fn with_clip(mut self, clip: &str, length: f32) -> Library {
        self.clips.insert(clip.to_string(), length);
        self
    }

    /// Makes creating a source for the given clip fail, even though it exists.
    pub fn fail_create(&self, clip: &str) {
        self.fail_create.lock().insert(clip.to_string());
    }

    /// Every source created so far, in creation order.
    pub fn sources(&self) -> Vec<Arc<Source>> {
        self.sources.lock().clone()
    }

    /// The most recently created source for the given clip.
    pub fn source(&self, clip: &str) -> Option<Arc<Source>> {
        self.sources
            .lock()
            .iter()
            .rev()
            .find(|source| source.clip == clip)
            .cloned()
    }
}

impl super::Library for Library {
    fn exists(&self, clip: &str) -> bool {
        self.clips.contains_key(clip)
    }

    fn create_source(&self, clip: &str) -> Result<Arc<dyn super::Source>, AudioError> {
        let length = self
            .clips
            .get(clip)
            .ok_or_else(|| AudioError::ClipNotFound(clip.to_string()))?;
        if self.fail_create.lock().contains(clip) {
            return Err(AudioError::Playback {
                clip: clip.to_string(),
                reason: "mock source creation failure".to_string(),
            });
        }
        let source = Arc::new(Source::new(clip, *length));
        self.sources.lock().push(Arc::clone(&source));
        Ok(source)
    }
}
