//! host: collaborators provided by the editor that embeds the library.
//!
//! The core never opens panels, dialogs or editors itself; it asks the host.
//! Every prompt returns before any mutation starts, so no lock is held while
//! the user is deciding.

use anyhow::Result;
use std::path::PathBuf;

/// File type filter for dialogs (label + extensions without dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub label: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn json() -> Self {
        Self {
            label: "JSON".to_string(),
            extensions: vec!["json".to_string()],
        }
    }
}

/// Registers a completion provider for a set of languages.
pub trait CompletionRegistry {
    /// Returns Ok(false) if the registration only takes effect after a host reload.
    fn register_completion(&mut self, languages: &[String]) -> Result<bool>;
}

/// Everything the protocol layer needs from the embedding editor.
pub trait Host: CompletionRegistry {
    /// Yes/no question. `modal` is used for destructive, irreversible actions.
    fn confirm(&mut self, message: &str, modal: bool) -> bool;

    /// Save-as dialog (backup target). None = cancelled.
    fn save_dialog(&mut self, filter: &FileFilter, label: &str) -> Option<PathBuf>;

    /// Open dialog (restore source). None = cancelled.
    fn open_dialog(&mut self, filter: &FileFilter, label: &str) -> Option<PathBuf>;

    /// Free-text input (language id for add-language). None = cancelled.
    fn input_box(&mut self, prompt: &str, placeholder: &str) -> Option<String>;

    /// Insert text at the cursor of the active (or first visible) editor.
    /// Ok(false) means there is no editing surface.
    fn insert_snippet(&mut self, text: &str) -> Result<bool>;

    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
}
