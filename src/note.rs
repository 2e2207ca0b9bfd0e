use crate::storage::read_note;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// A text buffer optionally bound to a file on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub content: String,
    pub path: Option<PathBuf>,
}

impl Note {
    /// Creates an empty, unbound note.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a note from an existing regular file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("Selected file does not exist or is not a valid file.");
        }
        let content = read_note(path)?;
        Ok(Self {
            content,
            path: Some(path.to_path_buf()),
        })
    }

    /// True when there is nothing but whitespace to save.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn is_new(&self) -> bool {
        self.path.is_none()
    }

    /// File name without its final extension.
    ///
    /// Names without a usable extension (`notes`, `.txt`, `notes.`) are
    /// returned whole.
    pub fn title_stem(&self) -> Option<String> {
        let name = self.path.as_ref()?.file_name()?.to_string_lossy().into_owned();
        match name.rfind('.') {
            Some(dot) if dot > 0 && dot < name.len() - 1 => Some(name[..dot].to_string()),
            _ => Some(name),
        }
    }

    /// Name shown in the editor title bar.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "New Note".to_string())
    }
}
