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
//! The note to command dispatcher.
//!
//! Pads send note-on messages on a single channel:
//!
//! ```text
//! 60 (C3)  - Toggle mute on track 1
//! 61 (C#3) - Create MIDI track
//! 62 (D3)  - Create audio track
//! 63 (D#3) - Launch scene 1
//! 64 (E3)  - Launch scene 2
//! 65 (F3)  - Launch scene 3
//! 66 (F#3) - Play/pause
//! 67 (G3)  - Stop
//! 68 (G#3) - Tempo +5 BPM
//! 69 (A3)  - Tempo -5 BPM
//! 70 (A#3) - Create project template
//! ```
use std::{collections::HashMap, sync::Arc};

use midly::{
    live::LiveEvent,
    num::{u4, u7},
    MidiMessage,
};
use tracing::{debug, info};

use crate::host::{HostError, Project, TrackKind};

mod command;

pub use command::Command;

/// The first note the surface listens to.
pub const FIRST_NOTE: u8 = 60;
/// The last note the surface listens to.
pub const LAST_NOTE: u8 = 70;

/// Ties a note number to a command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding {
    pub note: u7,
    pub command: Command,
}

impl Binding {
    fn new(note: u8, command: Command) -> Binding {
        Binding {
            note: u7::from(note),
            command,
        }
    }
}

/// The bindings the surface is set up with.
pub fn default_bindings() -> Vec<Binding> {
    vec![
        Binding::new(60, Command::ToggleMute),
        Binding::new(61, Command::CreateTrack(TrackKind::Midi)),
        Binding::new(62, Command::CreateTrack(TrackKind::Audio)),
        Binding::new(63, Command::LaunchScene(0)),
        Binding::new(64, Command::LaunchScene(1)),
        Binding::new(65, Command::LaunchScene(2)),
        Binding::new(66, Command::TogglePlay),
        Binding::new(67, Command::Stop),
        Binding::new(68, Command::TempoUp),
        Binding::new(69, Command::TempoDown),
        Binding::new(70, Command::BuildTemplate),
    ]
}

/// A control surface that turns note events into project commands.
pub struct Surface {
    /// The project the commands act on.
    project: Arc<dyn Project>,
    /// The MIDI channel the surface listens on.
    channel: u4,
    /// Note to command lookup. Emptied on disconnect.
    bindings: HashMap<u7, Command>,
}

impl Surface {
    /// Creates a surface listening on the given channel (0-indexed).
    pub fn new(project: Arc<dyn Project>, channel: u4) -> Surface {
        let bindings = default_bindings()
            .into_iter()
            .map(|binding| (binding.note, binding.command))
            .collect::<HashMap<u7, Command>>();

        info!(
            channel = channel.as_int() + 1,
            bindings = bindings.len(),
            "Control surface loaded."
        );

        Surface {
            project,
            channel,
            bindings,
        }
    }

    /// Returns the active bindings ordered by note.
    pub fn bindings(&self) -> Vec<Binding> {
        let mut bindings = self
            .bindings
            .iter()
            .map(|(note, command)| Binding {
                note: *note,
                command: *command,
            })
            .collect::<Vec<Binding>>();
        bindings.sort_by_key(|binding| binding.note);
        bindings
    }

    /// Returns the channel the surface listens on (0-indexed).
    pub fn channel(&self) -> u4 {
        self.channel
    }

    /// Handles a note event. A zero velocity is a release and does nothing, as
    /// do notes without a binding.
    pub fn on_note_event(&self, note: u7, velocity: u7) -> Result<(), HostError> {
        let command = match self.bindings.get(&note) {
            Some(command) => command,
            None => return Ok(()),
        };

        if velocity == 0 {
            return Ok(());
        }

        debug!(
            note = note.as_int(),
            velocity = velocity.as_int(),
            command = command.to_string(),
            "Dispatching command."
        );
        command.execute(self.project.as_ref(), velocity)
    }

    /// Handles a decoded MIDI event. Only notes on the surface channel are
    /// considered; note off is treated as a note on with zero velocity.
    pub fn handle_event(&self, event: &LiveEvent) -> Result<(), HostError> {
        match event {
            LiveEvent::Midi { channel, message } if *channel == self.channel => match *message {
                MidiMessage::NoteOn { key, vel } => self.on_note_event(key, vel),
                MidiMessage::NoteOff { key, .. } => self.on_note_event(key, u7::from(0)),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Releases all bindings. Events received afterwards are ignored.
    pub fn disconnect(&mut self) {
        self.bindings.clear();
        info!("Control surface disconnected.");
    }
}
