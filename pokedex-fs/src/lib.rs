//! Capability-based file helpers for the dataset file.
//!
//! Paths are UTF-8 ([`camino`]) and every operation goes through a
//! [`cap_std`] directory handle opened from ambient authority, so a relative
//! path cannot climb out of its anchor directory.
#![forbid(unsafe_code)]

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open an existing file for reading.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be opened.
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Whether `path` names a regular file.
///
/// # Errors
///
/// Returns [`io::ErrorKind::NotFound`] when nothing exists at `path`, or any
/// other I/O error raised while inspecting it.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_and_name(path)?;
    dir.metadata(&name).map(|meta| meta.is_file())
}

/// Create every missing directory above `path`.
///
/// # Errors
///
/// Returns the underlying I/O error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (anchor, relative) = anchored(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    anchor.create_dir_all(&relative)
}

/// Replace the file at `path` with `contents`.
///
/// The bytes are staged in a sibling file and renamed over the target, so
/// readers never observe a partial write. Missing parent directories are
/// created first.
///
/// # Errors
///
/// Returns the underlying I/O error when staging or renaming fails.
pub fn write_file_atomically(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_and_name(path)?;
    let staging = format!(".{name}.partial");
    dir.write(&staging, contents)?;
    dir.rename(&staging, &dir, &name).inspect_err(|_| {
        dir.remove_file(&staging).ok();
    })
}

fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `path` into an opened root (or the current directory) and the
/// remaining relative components.
fn anchored(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut base = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => base.push(component),
            other => relative.push(other),
        }
    }
    if base.as_str().is_empty() {
        base.push(".");
    }
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}
