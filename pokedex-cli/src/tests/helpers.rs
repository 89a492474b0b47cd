//! Test helpers for writing throwaway datasets.

use camino::{Utf8Path, Utf8PathBuf};
use pokedex_core::{Record, Stat};
use tempfile::TempDir;

/// A temporary directory holding a small dataset.
pub(super) struct DatasetFixture {
    _dir: TempDir,
    root: Utf8PathBuf,
    dataset: Utf8PathBuf,
}

impl DatasetFixture {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let dataset = root.join("pokemon.json");
        pokedex_data::write_dataset(&dataset, &sample_records()).expect("write dataset");
        Self {
            _dir: dir,
            root,
            dataset,
        }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn dataset(&self) -> &Utf8Path {
        &self.dataset
    }
}

fn creature(id: u32, name: &str, types: &[&str], hp: u32) -> Record {
    Record {
        id,
        name: name.to_owned(),
        types: types.iter().map(|t| (*t).to_owned()).collect(),
        stats: vec![Stat::new("hp", hp)],
        generation: Some("generation-i".to_owned()),
        ..Record::default()
    }
}

fn sample_records() -> Vec<Record> {
    vec![
        creature(4, "charmander", &["fire"], 39),
        creature(6, "charizard", &["fire", "flying"], 78),
        creature(7, "squirtle", &["water"], 44),
        creature(25, "pikachu", &["electric"], 35),
        Record {
            is_legendary: true,
            ..creature(146, "moltres", &["fire", "flying"], 90)
        },
    ]
}

/// Decode captured command output as JSON.
pub(super) fn parse_output(buffer: &[u8]) -> serde_json::Value {
    serde_json::from_slice(buffer).expect("output should be JSON")
}

/// Pull the `name` field of every element of a JSON array.
pub(super) fn names(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("output should be an array")
        .iter()
        .filter_map(|entry| entry.get("name").and_then(serde_json::Value::as_str))
        .map(str::to_owned)
        .collect()
}
