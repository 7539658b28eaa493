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
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::host::{
    self,
    session::{MAX_TEMPO, MIN_TEMPO},
    TrackKind,
};

pub(super) const DEFAULT_TEMPO: f64 = 120.0;
pub(super) const DEFAULT_SCENES: usize = 8;

/// A YAML representation of the starting state of the in-memory session.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Session {
    /// The starting tempo in BPM (default: 120).
    #[serde(skip_serializing_if = "Option::is_none")]
    tempo: Option<f64>,

    /// The number of scenes (default: 8).
    #[serde(skip_serializing_if = "Option::is_none")]
    scenes: Option<usize>,

    /// The most tracks the session will hold. Unlimited if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    track_limit: Option<usize>,

    /// Tracks that exist before the surface starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tracks: Vec<Track>,
}

/// A YAML representation of a pre-existing track.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Track {
    /// The track name.
    name: String,
    /// The kind of track.
    kind: TrackKind,
}

impl Session {
    /// Creates a session configuration with explicit defaults filled in.
    pub fn new(tempo: f64, scenes: usize) -> Session {
        Session {
            tempo: Some(tempo),
            scenes: Some(scenes),
            track_limit: None,
            tracks: Vec::new(),
        }
    }

    /// Returns the starting tempo.
    pub fn tempo(&self) -> Result<f64, ConfigError> {
        let tempo = self.tempo.unwrap_or(DEFAULT_TEMPO);
        if !(MIN_TEMPO..=MAX_TEMPO).contains(&tempo) {
            return Err(ConfigError::InvalidTempo(tempo));
        }
        Ok(tempo)
    }

    /// Returns the number of scenes.
    pub fn scenes(&self) -> usize {
        self.scenes.unwrap_or(DEFAULT_SCENES)
    }

    /// Builds the in-memory session described by this configuration.
    pub fn to_session(&self) -> Result<host::Session, ConfigError> {
        let mut session = self
            .tracks
            .iter()
            .fold(host::Session::new(), |session, track| {
                session.with_track(track.kind, &track.name)
            })
            .with_tempo(self.tempo()?)
            .with_scenes(self.scenes());

        if let Some(track_limit) = self.track_limit {
            session = session.with_track_limit(track_limit);
        }
        Ok(session)
    }
}
