//! Persistence of segmented scripts.
//!
//! Stored scenes keep their character list as a JSON-encoded string column.
//! Reading one back never fails on a bad character list: the set is emptied
//! and a warning logged.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::{Beat, Scene, SegmentedScript};

/// Row form of a [`Scene`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScene {
    pub id: String,
    pub number: usize,
    pub heading: String,
    pub location: Option<String>,
    pub time_of_day: Option<String>,
    /// JSON array of names, e.g. `["JOHN","MARY"]`
    pub characters: String,
    pub text: String,
    pub beats: Vec<Beat>,
}

impl From<&Scene> for StoredScene {
    fn from(scene: &Scene) -> Self {
        let names: Vec<&String> = scene.characters.iter().collect();
        Self {
            id: scene.id.clone(),
            number: scene.number,
            heading: scene.heading.clone(),
            location: scene.location.clone(),
            time_of_day: scene.time_of_day.clone(),
            // A list of strings always serializes
            characters: serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string()),
            text: scene.text.clone(),
            beats: scene.beats.clone(),
        }
    }
}

/// Decode a stored character list, falling back to an empty set.
fn decode_characters(scene_id: &str, raw: &str) -> BTreeSet<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(names) => names.into_iter().collect(),
        Err(e) => {
            warn!(
                "Could not parse characters for scene {}: {:?} ({})",
                scene_id, raw, e
            );
            BTreeSet::new()
        }
    }
}

impl StoredScene {
    pub fn into_scene(self) -> Scene {
        let characters = decode_characters(&self.id, &self.characters);
        Scene {
            id: self.id,
            number: self.number,
            heading: self.heading,
            location: self.location,
            time_of_day: self.time_of_day,
            characters,
            text: self.text,
            beats: self.beats,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredScript {
    script_id: String,
    scenes: Vec<StoredScene>,
}

impl SegmentedScript {
    /// Write the script as pretty JSON, in the stored-scene form.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredScript {
            script_id: self.script_id.clone(),
            scenes: self.scenes.iter().map(StoredScene::from).collect(),
        };

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &stored)
            .context("Failed to write segmented script JSON")?;
        Ok(())
    }

    /// Read a script written by [`SegmentedScript::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let stored: StoredScript = serde_json::from_reader(BufReader::new(file))
            .context("Failed to parse segmented script JSON")?;

        Ok(Self {
            script_id: stored.script_id,
            scenes: stored
                .scenes
                .into_iter()
                .map(StoredScene::into_scene)
                .collect(),
        })
    }
}
