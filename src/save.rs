//! Save strategies for notes.
//!
//! A note that is already bound to a file is always written back in place.
//! New notes go wherever the active [`SaveMode`] puts them.

use crate::api::{ApiError, TitleGenerator};
use crate::constants::DEFAULT_NOTE_TITLE;
use crate::naming::{current_timestamp_stem, sanitize_title};
use crate::note::Note;
use crate::storage::{create_note, create_unique_note, ensure_dir, with_txt_extension, write_note};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveMode {
    /// Ask the user for a path.
    Dialog,
    /// `note_YYYYMMDD_HHMMSS.txt` in the notes directory.
    Timestamp,
    /// Title from the configured provider, in the notes directory.
    #[default]
    GeneratedTitle,
}

impl SaveMode {
    pub const ALL: [SaveMode; 3] = [SaveMode::Dialog, SaveMode::Timestamp, SaveMode::GeneratedTitle];

    pub fn label(self) -> &'static str {
        match self {
            SaveMode::Dialog => "Ask where to save",
            SaveMode::Timestamp => "Timestamped file name",
            SaveMode::GeneratedTitle => "AI-generated title",
        }
    }

    /// Only the generated-title mode refuses blank notes; there is nothing to title.
    pub fn rejects_blank(self) -> bool {
        matches!(self, SaveMode::GeneratedTitle)
    }
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Cannot save an empty note.")]
    EmptyNote,
    #[error("No file was chosen.")]
    NoPathChosen,
    #[error("{} already exists; choose another name.", .0.display())]
    AlreadyExists(PathBuf),
    #[error("{0:#}")]
    Storage(#[from] anyhow::Error),
}

/// Where a save ended up, plus any non-fatal problem worth telling the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub warning: Option<String>,
}

impl SaveReport {
    /// Absolute form of the saved path for display.
    pub fn absolute_path(&self) -> PathBuf {
        std::fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }
}

pub struct NoteSaver<'a> {
    pub mode: SaveMode,
    pub notes_dir: &'a Path,
    pub generator: Option<&'a dyn TitleGenerator>,
}

impl<'a> NoteSaver<'a> {
    pub fn new(
        mode: SaveMode,
        notes_dir: &'a Path,
        generator: Option<&'a dyn TitleGenerator>,
    ) -> Self {
        Self {
            mode,
            notes_dir,
            generator,
        }
    }

    /// True when saving `note` needs a path from the user first.
    pub fn needs_chosen_path(&self, note: &Note) -> bool {
        note.is_new() && self.mode == SaveMode::Dialog
    }

    /// Persists `note` and binds it to the file it was written to.
    ///
    /// `chosen_path` is only consulted for new notes in [`SaveMode::Dialog`].
    pub async fn save(
        &self,
        note: &mut Note,
        chosen_path: Option<&Path>,
    ) -> Result<SaveReport, SaveError> {
        if self.mode.rejects_blank() && note.is_blank() {
            return Err(SaveError::EmptyNote);
        }

        if let Some(path) = note.path.clone() {
            write_note(&path, &note.content)?;
            tracing::info!(
                "Saved existing note '{}' to {:?}",
                note.title_stem().unwrap_or_default(),
                path
            );
            return Ok(SaveReport {
                path,
                warning: None,
            });
        }

        let (path, warning) = match self.mode {
            SaveMode::Dialog => {
                let chosen = chosen_path.ok_or(SaveError::NoPathChosen)?;
                let path = with_txt_extension(chosen);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    ensure_dir(parent)?;
                }
                if path == chosen {
                    write_note(&path, &note.content)?;
                } else {
                    // The overwrite prompt only covered the name the user picked.
                    create_note(&path, &note.content).map_err(|e| match e.kind() {
                        ErrorKind::AlreadyExists => SaveError::AlreadyExists(path.clone()),
                        _ => SaveError::Storage(
                            anyhow::Error::new(e).context(format!("Failed to create note {:?}", path)),
                        ),
                    })?;
                }
                (path, None)
            }
            SaveMode::Timestamp => {
                let stem = current_timestamp_stem()?;
                (create_unique_note(self.notes_dir, &stem, &note.content)?, None)
            }
            SaveMode::GeneratedTitle => {
                let generated = match self.generator {
                    Some(generator) => generator.generate_title(&note.content).await,
                    None => Err(ApiError::Config(
                        "No title provider is configured".to_string(),
                    )),
                };
                let (stem, warning) = resolve_title(generated)?;
                (
                    create_unique_note(self.notes_dir, &stem, &note.content)?,
                    warning,
                )
            }
        };

        tracing::info!("Saved new note to {:?}", path);
        note.path = Some(path.clone());
        Ok(SaveReport { path, warning })
    }
}

/// Picks the file stem for a generated-title save.
///
/// Provider failures fall back to [`DEFAULT_NOTE_TITLE`] and yield a warning;
/// a title that sanitizes to nothing falls back to a timestamp stem.
pub fn resolve_title(
    generated: Result<String, ApiError>,
) -> anyhow::Result<(String, Option<String>)> {
    match generated {
        Ok(raw) => {
            let stem = sanitize_title(&raw);
            if stem.is_empty() {
                tracing::warn!("Generated title {:?} is unusable, using timestamp", raw);
                Ok((current_timestamp_stem()?, None))
            } else {
                tracing::debug!("Using generated title {}", stem);
                Ok((stem, None))
            }
        }
        Err(e) => {
            tracing::error!("Error generating title: {}", e);
            Ok((
                DEFAULT_NOTE_TITLE.to_string(),
                Some(format!(
                    "Could not generate title. Saving with a default name.\nError: {}",
                    e
                )),
            ))
        }
    }
}
