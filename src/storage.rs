use crate::constants::{MAX_NAME_ATTEMPTS, NOTE_EXTENSION};
use crate::naming::candidate_name;
use anyhow::{bail, Context, Result};
use std::fs::{File, OpenOptions};
use std::io::prelude::*;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub fn read_note(filename: &Path) -> Result<String> {
    let file =
        File::open(filename).with_context(|| format!("Failed to open file: {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .with_context(|| "Failed to read file contents")?;
    Ok(contents)
}

/// Replaces `filename` with `contents` via a temporary file in the same directory.
pub fn write_note(filename: &Path, contents: &str) -> Result<()> {
    let dir = match filename.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    temp.write_all(contents.as_bytes())
        .with_context(|| "Failed to write content to temporary file")?;

    temp.as_file()
        .sync_all()
        .with_context(|| "Failed to sync temporary file")?;

    temp.persist(filename)
        .with_context(|| format!("Failed to rename temporary file to {:?}", filename))?;

    Ok(())
}

/// Writes a new file, failing with `AlreadyExists` instead of overwriting.
pub fn create_note(filename: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(filename)?;

    if let Err(e) = file.write_all(contents.as_bytes()).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = std::fs::remove_file(filename);
        return Err(e);
    }
    Ok(())
}

/// Saves `contents` as `stem.txt` in `dir`, trying `stem_1.txt`, `stem_2.txt`, ...
/// until a free name is found. Existing files are never touched.
pub fn create_unique_note(dir: &Path, stem: &str, contents: &str) -> Result<PathBuf> {
    ensure_dir(dir)?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(candidate_name(stem, attempt));
        match create_note(&path, contents) {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("{:?} already exists, trying next name", path);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create note {:?}", path));
            }
        }
    }

    bail!(
        "No free file name for '{}' in {:?} after {} attempts",
        stem,
        dir,
        MAX_NAME_ATTEMPTS
    )
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create notes directory {:?}", dir))?;
    }
    Ok(())
}

/// Forces the `.txt` extension onto a user-chosen path.
pub fn with_txt_extension(path: &Path) -> PathBuf {
    let mut path_buf = path.to_path_buf();
    if path_buf.extension().is_none_or(|ext| ext != NOTE_EXTENSION) {
        path_buf.set_extension(NOTE_EXTENSION);
    }
    path_buf
}
