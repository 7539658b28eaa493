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
use std::{error::Error, sync::Arc};

use midly::live::LiveEvent;
use tokio::{
    sync::mpsc,
    task::{JoinError, JoinHandle},
};
use tracing::{error, info, span, Instrument, Level};

use crate::{midi::Device, surface::Surface};

/// How many raw events can queue up before the MIDI callback blocks.
const EVENT_BUFFER_SIZE: usize = 10;

/// Feeds events from a MIDI device into a control surface.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Starts watching the device and dispatching its events to the surface.
    pub fn new(surface: Surface, device: Arc<dyn Device>) -> Result<Controller, Box<dyn Error>> {
        let (midi_events_tx, midi_events_rx) = mpsc::channel::<Vec<u8>>(EVENT_BUFFER_SIZE);
        device.watch_events(midi_events_tx)?;

        let span = span!(Level::INFO, "controller", device = device.name());
        Ok(Controller {
            handle: tokio::spawn(
                Controller::dispatch_events(surface, device, midi_events_rx).instrument(span),
            ),
        })
    }

    /// Join will block until the controller finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Dispatches events one at a time until the device stops sending them.
    async fn dispatch_events(
        mut surface: Surface,
        device: Arc<dyn Device>,
        mut midi_events_rx: mpsc::Receiver<Vec<u8>>,
    ) {
        info!("Controller started.");

        loop {
            let raw_event = match midi_events_rx.recv().await {
                Some(raw_event) => raw_event,
                None => {
                    info!("MIDI watcher closed.");
                    device.stop_watch_events();
                    surface.disconnect();
                    return;
                }
            };

            let event = match LiveEvent::parse(&raw_event) {
                Ok(event) => event,
                Err(e) => {
                    error!(err = format!("{:?}", e), "Error parsing event.");
                    continue;
                }
            };

            if let Err(e) = surface.handle_event(&event) {
                error!(
                    err = e.to_string(),
                    event = format!("{:?}", event),
                    "Command failed."
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, sync::Arc};

    use midly::{
        live::LiveEvent,
        num::{u4, u7},
        MidiMessage,
    };

    use crate::{
        host::{Project, Session},
        midi::{self, Device},
        surface::Surface,
        testutil::eventually,
    };

    use super::Controller;

    fn note_on(key: u8, vel: u8) -> Result<Vec<u8>, Box<dyn Error>> {
        let mut buf: Vec<u8> = Vec::with_capacity(8);
        LiveEvent::Midi {
            channel: u4::from(0),
            message: MidiMessage::NoteOn {
                key: u7::from(key),
                vel: u7::from(vel),
            },
        }
        .write(&mut buf)?;
        Ok(buf)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_controller() -> Result<(), Box<dyn Error>> {
        let session = Session::new().with_scenes(3).with_track_limit(4);
        let midi_device = midi::test::Device::get("mock-midi-device");
        let surface = Surface::new(Arc::new(session.clone()), u4::from(0));

        let mut controller = Controller::new(surface, Arc::new(midi_device.clone()))?;
        assert!(midi_device.is_watched());

        let invalid_buf: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut unrecognized_buf: Vec<u8> = Vec::with_capacity(8);
        LiveEvent::Midi {
            channel: u4::from(0),
            message: MidiMessage::ProgramChange {
                program: u7::from(27),
            },
        }
        .write(&mut unrecognized_buf)?;

        // Garbage and unrelated events are skipped.
        midi_device.mock_event(&invalid_buf);
        midi_device.mock_event(&unrecognized_buf);
        midi_device.mock_event(&note_on(66, 127)?);
        eventually(|| session.is_playing(), "Playback never started");

        midi_device.mock_event(&note_on(66, 0)?);
        midi_device.mock_event(&note_on(67, 100)?);
        eventually(|| !session.is_playing(), "Playback never stopped");

        midi_device.mock_event(&note_on(64, 100)?);
        eventually(
            || session.fired_scenes() == vec![1],
            "Scene 2 was never launched",
        );

        // The template fails partway through, but the controller keeps going.
        midi_device.mock_event(&note_on(70, 127)?);
        eventually(|| session.track_count() == 4, "Template never started");
        midi_device.mock_event(&note_on(68, 127)?);
        eventually(|| session.tempo() == 125.0, "Tempo never changed");

        midi_device.stop_watch_events();
        controller.join().await?;
        assert!(!midi_device.is_watched());

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_watch_twice() -> Result<(), Box<dyn Error>> {
        let midi_device = Arc::new(midi::test::Device::get("mock-midi-device"));
        let first = Surface::new(Arc::new(Session::new()), u4::from(0));
        let second = Surface::new(Arc::new(Session::new()), u4::from(0));

        let mut controller = Controller::new(first, midi_device.clone())?;
        assert!(Controller::new(second, midi_device.clone()).is_err());

        midi_device.stop_watch_events();
        controller.join().await?;
        Ok(())
    }
}
