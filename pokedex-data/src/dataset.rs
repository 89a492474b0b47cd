//! Dataset file output.

use camino::Utf8Path;
use pokedex_core::Record;

use crate::IngestError;

/// Serialise `records` as a JSON array and replace the file at `path`.
///
/// Parent directories are created when missing. The file is written in full
/// or not at all.
///
/// # Errors
///
/// Returns [`IngestError::SerialiseDataset`] if encoding fails and
/// [`IngestError::WriteDataset`] if the file cannot be written.
pub fn write_dataset(path: &Utf8Path, records: &[Record]) -> Result<(), IngestError> {
    let mut payload = serde_json::to_vec_pretty(records)
        .map_err(|source| IngestError::SerialiseDataset { source })?;
    payload.push(b'\n');
    pokedex_fs::write_file_atomically(path, &payload).map_err(|source| {
        IngestError::WriteDataset {
            path: path.to_path_buf(),
            source,
        }
    })
}
