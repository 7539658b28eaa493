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

use midly::num::u7;
use tracing::info;

use crate::{
    host::{HostError, Project, TrackKind},
    template,
};

/// How much a single tempo nudge moves the tempo, in BPM.
pub const TEMPO_STEP: f64 = 5.0;
/// Tempo nudges never go above this.
pub const TEMPO_CEILING: f64 = 999.0;
/// Tempo nudges never go below this.
pub const TEMPO_FLOOR: f64 = 20.0;

/// Actions the surface can perform against the project.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Flips the mute flag of the first track, if there is one.
    ToggleMute,

    /// Appends a new track of the given kind.
    CreateTrack(TrackKind),

    /// Fires the scene at the given index, if it exists.
    LaunchScene(usize),

    /// Stops the transport if it's playing, starts it otherwise.
    TogglePlay,

    /// Stops the transport.
    Stop,

    /// Raises the tempo by one step.
    TempoUp,

    /// Lowers the tempo by one step.
    TempoDown,

    /// Appends the project template tracks.
    BuildTemplate,
}

impl Command {
    /// Runs the command against the project. The velocity has already been
    /// checked to be non-zero by the caller.
    pub fn execute(&self, project: &dyn Project, velocity: u7) -> Result<(), HostError> {
        match *self {
            Command::ToggleMute => {
                if project.track_count() > 0 {
                    let mute = project.track_mute(0)?;
                    project.set_track_mute(0, !mute)?;
                    info!(track = 0, mute = !mute, "Toggled mute.");
                }
            }
            Command::CreateTrack(kind) => {
                let index = project.track_count();
                project.create_track(kind, index)?;
                info!(index, kind = kind.to_string(), "Created track.");
            }
            Command::LaunchScene(scene) => {
                if scene < project.scene_count() {
                    project.fire_scene(scene)?;
                    info!(scene, velocity = velocity.as_int(), "Launched scene.");
                }
            }
            Command::TogglePlay => {
                if project.is_playing() {
                    project.stop_playing()?;
                    info!("Stopped playback.");
                } else {
                    project.start_playing()?;
                    info!("Started playback.");
                }
            }
            Command::Stop => {
                project.stop_playing()?;
                info!("Stopped playback.");
            }
            Command::TempoUp => {
                project.set_tempo((project.tempo() + TEMPO_STEP).min(TEMPO_CEILING))?;
                info!(tempo = project.tempo(), "Tempo changed.");
            }
            Command::TempoDown => {
                project.set_tempo((project.tempo() - TEMPO_STEP).max(TEMPO_FLOOR))?;
                info!(tempo = project.tempo(), "Tempo changed.");
            }
            Command::BuildTemplate => template::build(project)?,
        }

        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ToggleMute => write!(f, "Toggle mute on track 1"),
            Command::CreateTrack(kind) => write!(f, "Create {} track", kind),
            Command::LaunchScene(scene) => write!(f, "Launch scene {}", scene + 1),
            Command::TogglePlay => write!(f, "Play/pause"),
            Command::Stop => write!(f, "Stop"),
            Command::TempoUp => write!(f, "Tempo +{} BPM", TEMPO_STEP),
            Command::TempoDown => write!(f, "Tempo -{} BPM", TEMPO_STEP),
            Command::BuildTemplate => write!(f, "Create project template"),
        }
    }
}
