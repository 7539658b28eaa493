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
use std::{error::Error, path::Path, sync::Arc};

use config::{Config, File};
use midly::num::u4;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{controller::Controller, host, midi, surface};

mod error;
mod session;

pub use error::ConfigError;
pub use session::Session;

use self::session::{DEFAULT_SCENES, DEFAULT_TEMPO};

const DEFAULT_CHANNEL: u8 = 1;

/// The configuration for the control surface.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Surface {
    /// The MIDI input device to listen to.
    midi_device: String,

    /// The MIDI channel to listen on, 1-16 (default: 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<u8>,

    /// The starting state of the session the surface controls.
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<Session>,
}

impl Surface {
    /// Creates a new surface configuration.
    pub fn new(midi_device: &str, channel: Option<u8>, session: Option<Session>) -> Surface {
        Surface {
            midi_device: midi_device.to_string(),
            channel,
            session,
        }
    }

    /// A configuration with every default spelled out.
    pub fn example() -> Surface {
        Surface::new(
            "mock-midi-device",
            Some(DEFAULT_CHANNEL),
            Some(Session::new(DEFAULT_TEMPO, DEFAULT_SCENES)),
        )
    }

    /// Parse a surface configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Surface, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Surface>()?)
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Returns the MIDI device name.
    pub fn midi_device(&self) -> &str {
        &self.midi_device
    }

    /// Returns the 0-indexed MIDI channel.
    pub fn channel(&self) -> Result<u4, ConfigError> {
        let channel = self.channel.unwrap_or(DEFAULT_CHANNEL);
        if !(1..=16).contains(&channel) {
            return Err(ConfigError::InvalidChannel(channel));
        }
        Ok(u4::from(channel - 1))
    }

    /// Returns the session configuration.
    pub fn session(&self) -> Session {
        self.session.clone().unwrap_or_default()
    }
}

/// Initializes the session, surface and controller from the given config file.
/// The returned session handle observes the same state the surface controls.
pub fn init_controller(path: &Path) -> Result<(Controller, host::Session), Box<dyn Error>> {
    let config = Surface::deserialize(path)?;
    let session = config.session().to_session()?;
    let device = midi::get_device(config.midi_device())?;

    info!(
        device = device.to_string(),
        session = session.to_string(),
        "Initializing control surface."
    );

    let surface = surface::Surface::new(Arc::new(session.clone()), config.channel()?);
    Ok((Controller::new(surface, device)?, session))
}

#[cfg(test)]
mod test {
    use std::{error::Error, io::Write};

    use crate::host::Project;

    use super::*;

    fn write_config(yaml: &str) -> Result<tempfile::NamedTempFile, Box<dyn Error>> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        file.write_all(yaml.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_deserialize() -> Result<(), Box<dyn Error>> {
        let file = write_config(
            r#"
            midi_device: nanoKEY2
            channel: 10
            session:
              tempo: 140
              scenes: 4
        "#,
        )?;

        let config = Surface::deserialize(file.path())?;
        assert_eq!(config.midi_device(), "nanoKEY2");
        assert_eq!(config.channel()?, 9);
        let session = config.session().to_session()?;
        assert_eq!(session.tempo(), 140.0);
        assert_eq!(session.scene_count(), 4);
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<(), Box<dyn Error>> {
        let file = write_config("midi_device: mock-midi-device")?;

        let config = Surface::deserialize(file.path())?;
        assert_eq!(config.channel()?, 0);
        assert_eq!(config.session().scenes(), DEFAULT_SCENES);
        Ok(())
    }

    #[test]
    fn test_invalid_channel() {
        for channel in [0, 17] {
            let config = Surface::new("mock-midi-device", Some(channel), None);
            assert!(matches!(
                config.channel(),
                Err(ConfigError::InvalidChannel(c)) if c == channel
            ));
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Surface::deserialize(Path::new("does-not-exist.yaml")),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_example_round_trips() -> Result<(), Box<dyn Error>> {
        let file = write_config(&Surface::example().to_yaml()?)?;

        let config = Surface::deserialize(file.path())?;
        assert_eq!(config.midi_device(), "mock-midi-device");
        assert_eq!(config.channel()?, 0);
        assert_eq!(config.session().tempo()?, DEFAULT_TEMPO);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_init_controller() -> Result<(), Box<dyn Error>> {
        let file = write_config(
            r#"
            midi_device: mock-midi-device
            session:
              tracks:
                - name: Drums
                  kind: audio
        "#,
        )?;

        let (_controller, session) = init_controller(file.path())?;
        assert_eq!(session.track_count(), 1);
        assert!(!session.is_playing());
        Ok(())
    }
}
