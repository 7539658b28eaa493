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
use std::error::Error;
use std::path::PathBuf;

use aicontrol::{config, midi, surface};
use clap::{crate_version, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A MIDI control surface for a DAW session."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available MIDI input devices.
    MidiDevices {},
    /// Prints the note to command bindings.
    Bindings {},
    /// Prints a configuration file with all defaults filled in.
    DefaultConfig {},
    /// Start will listen to the configured MIDI device until its input closes.
    Start {
        /// The path to the surface config.
        config_path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::MidiDevices {} => {
            let devices = midi::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Bindings {} => {
            println!("Bindings (count: {}):", surface::default_bindings().len());
            for binding in surface::default_bindings() {
                println!("- {:>3}: {}", binding.note.as_int(), binding.command);
            }
        }
        Commands::DefaultConfig {} => {
            print!("{}", config::Surface::example().to_yaml()?);
        }
        Commands::Start { config_path } => {
            let (mut controller, session) =
                config::init_controller(&PathBuf::from(config_path))?;
            controller.join().await?;
            info!(session = session.to_string(), "Control surface stopped.");
        }
    }

    Ok(())
}
