//! Application-wide constants for notes-rs.
//!
//! Centralizes all magic numbers and configuration values to improve maintainability
//! and make the codebase self-documenting.

use std::time::Duration;

// ============================================================================
// Application Identity
// ============================================================================

/// GTK Application ID following reverse-DNS convention.
pub const APP_ID: &str = "com.github.notes-rs";

/// Application name displayed in the main window title.
pub const APP_NAME: &str = "Note Taker";

/// Directory name used under the user config directory.
pub const CONFIG_DIR_NAME: &str = "notes-rs";

// ============================================================================
// Window Configuration
// ============================================================================

pub const MAIN_WINDOW_WIDTH: i32 = 400;
pub const MAIN_WINDOW_HEIGHT: i32 = 200;

pub const EDITOR_WINDOW_WIDTH: i32 = 700;
pub const EDITOR_WINDOW_HEIGHT: i32 = 500;

/// Prefix of every editor window title.
pub const EDITOR_TITLE_PREFIX: &str = "Note Editor";

// ============================================================================
// Note Storage
// ============================================================================

/// Name of the notes directory created under the user's documents folder.
pub const NOTES_DIR_NAME: &str = "my_notes";

/// Extension enforced on every saved note.
pub const NOTE_EXTENSION: &str = "txt";

/// Stem used when title generation fails.
pub const DEFAULT_NOTE_TITLE: &str = "untitled_note";

/// Prefix for timestamp-derived stems (`note_20240131_235959`).
pub const TIMESTAMP_STEM_PREFIX: &str = "note";

/// strftime pattern for timestamp-derived stems.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Upper bound on `_N` suffixes tried before giving up on a free file name.
pub const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Maximum length of a sanitized title stem, in characters.
pub const MAX_TITLE_CHARS: usize = 64;

// ============================================================================
// Title Generation
// ============================================================================

/// HTTP request timeout for title generation.
pub const AI_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Low temperature keeps titles short and stable.
pub const AI_TEMPERATURE: f32 = 0.2;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Value shipped in sample configs; treated the same as a missing key.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_GEMINI_API_KEY";

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const OLLAMA_DEFAULT_MODEL: &str = "qwen2.5:0.5b";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Instruction sent ahead of the note body when asking for a title.
pub const TITLE_PROMPT: &str = "Your task is to create a title for these notes, following the word-word format. \
This means the title should consist of two words separated by a hyphen. \
For example, a grocery list might be grocery-list, while someone's dream journal might be dream-journal. \
Generate a title that accurately reflects the content of the notes. \
Only respond with the title of the notes. Notes: ";
