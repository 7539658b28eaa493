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

use parking_lot::Mutex;
use tracing::debug;

use super::{ColorToken, HostError, Project, TrackKind};

/// The lowest tempo the session accepts.
pub const MIN_TEMPO: f64 = 20.0;
/// The highest tempo the session accepts.
pub const MAX_TEMPO: f64 = 999.0;

const DEFAULT_TEMPO: f64 = 120.0;

/// A track in the session.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub kind: TrackKind,
    pub name: String,
    pub color: Option<ColorToken>,
    pub mute: bool,
}

impl Track {
    fn new(kind: TrackKind, number: usize) -> Track {
        Track {
            kind,
            name: format!("{}-{}", number, kind),
            color: None,
            mute: false,
        }
    }
}

#[derive(Default)]
struct State {
    tracks: Vec<Track>,
    scene_count: usize,
    fired_scenes: Vec<usize>,
    playing: bool,
    tempo: f64,
    track_limit: Option<usize>,
}

/// An in-memory project. Clones share the same underlying state so that one
/// handle can be given to the surface while another is used to observe it.
#[derive(Clone)]
pub struct Session {
    state: Arc<Mutex<State>>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    /// Creates an empty, stopped session at the default tempo.
    pub fn new() -> Session {
        Session {
            state: Arc::new(Mutex::new(State {
                tempo: DEFAULT_TEMPO,
                ..Default::default()
            })),
        }
    }

    /// Sets the number of scenes.
    pub fn with_scenes(self, scene_count: usize) -> Session {
        self.state.lock().scene_count = scene_count;
        self
    }

    /// Sets the starting tempo. The value is not range checked here.
    pub fn with_tempo(self, tempo: f64) -> Session {
        self.state.lock().tempo = tempo;
        self
    }

    /// Adds a named track at the end of the session.
    pub fn with_track(self, kind: TrackKind, name: &str) -> Session {
        {
            let mut state = self.state.lock();
            let mut track = Track::new(kind, state.tracks.len() + 1);
            track.name = name.to_string();
            state.tracks.push(track);
        }
        self
    }

    /// Caps the number of tracks the session will hold.
    pub fn with_track_limit(self, track_limit: usize) -> Session {
        self.state.lock().track_limit = Some(track_limit);
        self
    }

    /// Returns a copy of all tracks.
    pub fn tracks(&self) -> Vec<Track> {
        self.state.lock().tracks.clone()
    }

    /// Returns the scenes that have been fired, in order.
    pub fn fired_scenes(&self) -> Vec<usize> {
        self.state.lock().fired_scenes.clone()
    }

    fn with_track_mut<F, R>(&self, index: usize, f: F) -> Result<R, HostError>
    where
        F: FnOnce(&mut Track) -> R,
    {
        let mut state = self.state.lock();
        let count = state.tracks.len();
        match state.tracks.get_mut(index) {
            Some(track) => Ok(f(track)),
            None => Err(HostError::InvalidTrackIndex { index, count }),
        }
    }
}

impl Project for Session {
    fn track_count(&self) -> usize {
        self.state.lock().tracks.len()
    }

    fn create_track(&self, kind: TrackKind, index: usize) -> Result<(), HostError> {
        let mut state = self.state.lock();
        let count = state.tracks.len();
        if index > count {
            return Err(HostError::InvalidTrackIndex { index, count });
        }
        if state.track_limit.is_some_and(|limit| count >= limit) {
            return Err(HostError::TrackLimit(count));
        }

        state.tracks.insert(index, Track::new(kind, count + 1));
        debug!(index, kind = kind.to_string(), "Track created.");
        Ok(())
    }

    fn track_mute(&self, index: usize) -> Result<bool, HostError> {
        self.with_track_mut(index, |track| track.mute)
    }

    fn set_track_mute(&self, index: usize, mute: bool) -> Result<(), HostError> {
        self.with_track_mut(index, |track| track.mute = mute)
    }

    fn set_track_name(&self, index: usize, name: &str) -> Result<(), HostError> {
        self.with_track_mut(index, |track| track.name = name.to_string())
    }

    fn set_track_color(&self, index: usize, color: ColorToken) -> Result<(), HostError> {
        self.with_track_mut(index, |track| track.color = Some(color))
    }

    fn scene_count(&self) -> usize {
        self.state.lock().scene_count
    }

    fn fire_scene(&self, index: usize) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if index >= state.scene_count {
            return Err(HostError::InvalidSceneIndex {
                index,
                count: state.scene_count,
            });
        }
        state.fired_scenes.push(index);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn start_playing(&self) -> Result<(), HostError> {
        self.state.lock().playing = true;
        Ok(())
    }

    fn stop_playing(&self) -> Result<(), HostError> {
        self.state.lock().playing = false;
        Ok(())
    }

    fn tempo(&self) -> f64 {
        self.state.lock().tempo
    }

    fn set_tempo(&self, bpm: f64) -> Result<(), HostError> {
        if !(MIN_TEMPO..=MAX_TEMPO).contains(&bpm) {
            return Err(HostError::TempoOutOfRange(bpm));
        }
        self.state.lock().tempo = bpm;
        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        write!(
            f,
            "{} tracks, {} scenes, {:.1} BPM, {}",
            state.tracks.len(),
            state.scene_count,
            state.tempo,
            if state.playing { "playing" } else { "stopped" }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn create_track_bounds() {
        let session = Session::new();
        assert_eq!(
            session.create_track(TrackKind::Midi, 1),
            Err(HostError::InvalidTrackIndex { index: 1, count: 0 })
        );
        assert!(session.create_track(TrackKind::Midi, 0).is_ok());
        assert!(session.create_track(TrackKind::Audio, 1).is_ok());

        let tracks = session.tracks();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].kind, TrackKind::Midi);
        assert_eq!(tracks[1].kind, TrackKind::Audio);
        assert_eq!(tracks[1].name, "2-audio");
    }

    #[test]
    fn track_limit() {
        let session = Session::new().with_track_limit(1);
        assert!(session.create_track(TrackKind::Midi, 0).is_ok());
        assert_eq!(
            session.create_track(TrackKind::Midi, 1),
            Err(HostError::TrackLimit(1))
        );
    }

    #[test]
    fn scenes() {
        let session = Session::new().with_scenes(2);
        assert!(session.fire_scene(1).is_ok());
        assert_eq!(
            session.fire_scene(2),
            Err(HostError::InvalidSceneIndex { index: 2, count: 2 })
        );
        assert_eq!(session.fired_scenes(), vec![1]);
    }

    #[test]
    fn tempo_range() {
        let session = Session::new();
        assert_eq!(session.tempo(), 120.0);
        assert!(session.set_tempo(MIN_TEMPO).is_ok());
        assert!(session.set_tempo(MAX_TEMPO).is_ok());
        assert_eq!(
            session.set_tempo(1000.0),
            Err(HostError::TempoOutOfRange(1000.0))
        );
        assert_eq!(session.tempo(), MAX_TEMPO);
    }

    #[test]
    fn clones_share_state() {
        let session = Session::new().with_track(TrackKind::Audio, "Vox");
        let observer = session.clone();
        assert!(session.set_track_mute(0, true).is_ok());
        assert_eq!(observer.track_mute(0), Ok(true));
        assert_eq!(
            observer.set_track_name(3, "nope"),
            Err(HostError::InvalidTrackIndex { index: 3, count: 1 })
        );
        assert_eq!(observer.to_string(), "1 tracks, 0 scenes, 120.0 BPM, stopped");
    }
}
