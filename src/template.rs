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
use tracing::{info, span, Level};

use crate::host::{ColorToken, HostError, Project, TrackKind};

/// The tracks created by the project template, in creation order.
pub const TEMPLATE_TRACKS: [&str; 8] = [
    "Kick",
    "Snare",
    "Hats",
    "Bass",
    "Reese",
    "Pads",
    "FX",
    "Master FX",
];

/// The color groups used by the project template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorCategory {
    Kick,
    SnareHats,
    BassReese,
    Pads,
    /// Anything that isn't matched above.
    Other,
}

impl ColorCategory {
    /// Picks the color category for a track name. Names that aren't
    /// explicitly grouped fall into `Other`.
    pub fn for_name(name: &str) -> ColorCategory {
        match name {
            "Kick" => ColorCategory::Kick,
            "Snare" | "Hats" => ColorCategory::SnareHats,
            "Bass" | "Reese" => ColorCategory::BassReese,
            "Pads" => ColorCategory::Pads,
            _ => ColorCategory::Other,
        }
    }

    /// The palette entry for this category.
    pub fn color(&self) -> ColorToken {
        match self {
            ColorCategory::Kick => ColorToken(6), // Red
            ColorCategory::SnareHats => ColorToken(60), // Orange
            ColorCategory::BassReese => ColorToken(23), // Blue
            ColorCategory::Pads => ColorToken(17), // Purple
            ColorCategory::Other => ColorToken(13), // Green
        }
    }
}

/// A single track of the project template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateEntry {
    pub name: &'static str,
    pub category: ColorCategory,
}

/// Returns the template entries in creation order.
pub fn entries() -> Vec<TemplateEntry> {
    TEMPLATE_TRACKS
        .into_iter()
        .map(|name| TemplateEntry {
            name,
            category: ColorCategory::for_name(name),
        })
        .collect()
}

/// Appends the template tracks to the end of the project, naming and coloring
/// each one as it goes. Tracks created before a failure are left in place.
pub fn build(project: &dyn Project) -> Result<(), HostError> {
    let span = span!(Level::INFO, "build template");
    let _enter = span.enter();

    info!("Creating project template.");

    for entry in entries() {
        let index = project.track_count();
        project.create_track(TrackKind::Midi, index)?;
        project.set_track_name(index, entry.name)?;
        project.set_track_color(index, entry.category.color())?;
        info!(
            index,
            name = entry.name,
            color = entry.category.color().0,
            "Created template track."
        );
    }

    info!("Project template created.");
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::host::{Project, Session};

    use super::*;

    #[test]
    fn categories() {
        let categories = entries()
            .into_iter()
            .map(|entry| entry.category)
            .collect::<Vec<ColorCategory>>();
        assert_eq!(
            categories,
            vec![
                ColorCategory::Kick,
                ColorCategory::SnareHats,
                ColorCategory::SnareHats,
                ColorCategory::BassReese,
                ColorCategory::BassReese,
                ColorCategory::Pads,
                ColorCategory::Other,
                ColorCategory::Other,
            ]
        );

        // Unknown names land in the catch-all bucket.
        assert_eq!(ColorCategory::for_name("Vox"), ColorCategory::Other);
        assert_eq!(ColorCategory::for_name("kick"), ColorCategory::Other);
    }

    #[test]
    fn build_appends_after_existing_tracks() -> Result<(), HostError> {
        let session = Session::new()
            .with_track(TrackKind::Audio, "Vox")
            .with_track(TrackKind::Audio, "Guitar");

        build(&session)?;

        let tracks = session.tracks();
        assert_eq!(tracks.len(), 10);
        assert_eq!(tracks[0].name, "Vox");
        assert_eq!(tracks[1].name, "Guitar");
        for (track, name) in tracks[2..].iter().zip(TEMPLATE_TRACKS) {
            assert_eq!(track.name, name);
            assert_eq!(track.kind, TrackKind::Midi);
            assert_eq!(track.color, Some(ColorCategory::for_name(name).color()));
        }
        Ok(())
    }

    #[test]
    fn build_is_not_transactional() {
        let session = Session::new().with_track_limit(3);

        assert_eq!(build(&session), Err(HostError::TrackLimit(3)));

        let names = session
            .tracks()
            .into_iter()
            .map(|track| track.name)
            .collect::<Vec<String>>();
        assert_eq!(names, vec!["Kick", "Snare", "Hats"]);
        assert_eq!(session.track_count(), 3);
    }
}
