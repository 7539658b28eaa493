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
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod session;

pub use session::Session;

/// The kind of content a track can hold.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Midi,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Midi => write!(f, "MIDI"),
            TrackKind::Audio => write!(f, "audio"),
        }
    }
}

/// An index into the host's fixed track color palette.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorToken(pub u8);

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color {}", self.0)
    }
}

/// Errors raised by the host's project model.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HostError {
    #[error("track index {index} is invalid (track count: {count})")]
    InvalidTrackIndex { index: usize, count: usize },

    #[error("scene index {index} is invalid (scene count: {count})")]
    InvalidSceneIndex { index: usize, count: usize },

    #[error("tempo {0} BPM is outside of the allowed range")]
    TempoOutOfRange(f64),

    #[error("unable to create track: the project already has {0} tracks")]
    TrackLimit(usize),
}

/// The project (song) of the host application. This is everything the control
/// surface is allowed to touch.
pub trait Project: Send + Sync {
    /// Returns the number of tracks in the project.
    fn track_count(&self) -> usize;

    /// Creates a new track of the given kind at the given index.
    fn create_track(&self, kind: TrackKind, index: usize) -> Result<(), HostError>;

    /// Returns whether the track at the given index is muted.
    fn track_mute(&self, index: usize) -> Result<bool, HostError>;

    /// Mutes or unmutes the track at the given index.
    fn set_track_mute(&self, index: usize, mute: bool) -> Result<(), HostError>;

    /// Renames the track at the given index.
    fn set_track_name(&self, index: usize, name: &str) -> Result<(), HostError>;

    /// Colors the track at the given index.
    fn set_track_color(&self, index: usize, color: ColorToken) -> Result<(), HostError>;

    /// Returns the number of scenes in the project.
    fn scene_count(&self) -> usize;

    /// Fires (launches) the scene at the given index.
    fn fire_scene(&self, index: usize) -> Result<(), HostError>;

    /// Returns true if the transport is playing.
    fn is_playing(&self) -> bool;

    /// Starts the transport.
    fn start_playing(&self) -> Result<(), HostError>;

    /// Stops the transport.
    fn stop_playing(&self) -> Result<(), HostError>;

    /// Returns the global tempo in BPM.
    fn tempo(&self) -> f64;

    /// Sets the global tempo in BPM.
    fn set_tempo(&self, bpm: f64) -> Result<(), HostError>;
}
