//! protocol: requests from the editor panel and the single dispatch point.
//!
//! Wire form (JSON): {"command": "<camelCase variant>", "data": {...}}.
//! Unit variants carry no "data".
//!
//! Extension ties the store to a Host:
//! - activate(): opens the store; failure is reported once and disables the feature set
//!   (open_editor/dispatch then explain why instead of failing on each call);
//! - dispatch(): runs one request, turns any error into a host error message;
//! - completions(): candidates for the editor's language.

use anyhow::Result;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::backup::{backup_to_file, restore_from_file};
use crate::completion::{build_candidates, Candidate};
use crate::config::LibraryConfig;
use crate::host::{FileFilter, Host};
use crate::ops::{add_language, delete_snippet, save_snippet, AddLanguageOutcome, SaveOutcome, SaveRequest};
use crate::snippet::{Body, Snapshot};
use crate::store::SnippetStore;
use crate::view::presentation_view;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertRequest {
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum Request {
    GetSnippets,
    SaveSnippet(SaveRequest),
    DeleteSnippet(DeleteRequest),
    InsertSnippet(InsertRequest),
    BackupSnippets,
    RestoreSnippets,
    AddLanguage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum Response {
    /// Full presentation view (with synthesized `global`).
    LoadSnippets(Snapshot),
}

pub const MSG_NO_EDITOR: &str = "Please open a text editor to insert the snippet.";
pub const MSG_SAVED: &str = "Snippet saved successfully!";
pub const MSG_DELETED: &str = "Snippet deleted successfully!";
pub const MSG_BACKED_UP: &str = "Snippets backed up successfully!";
pub const MSG_RESTORED: &str = "Snippets restored successfully!";
pub const MSG_RESTORE_CONFIRM: &str =
    "Restoring will merge/overwrite existing snippets. Do you want to continue?";

pub struct Extension {
    store: Option<SnippetStore>,
    init_error: Option<String>,
}

impl Extension {
    /// Open the library at `root` and register completions for its languages.
    /// Never fails: an open error is kept and reported through the host.
    pub fn activate<H: Host + ?Sized>(root: &Path, cfg: LibraryConfig, host: &mut H) -> Self {
        match SnippetStore::open_with_config(root, cfg) {
            Ok(store) => {
                let languages: Vec<String> = store.language_ids().into_iter().collect();
                if !languages.is_empty() {
                    if let Err(e) = host.register_completion(&languages) {
                        warn!("activate: completion registration failed: {:#}", e);
                    }
                }
                info!("Snippet Library initialized successfully.");
                Self {
                    store: Some(store),
                    init_error: None,
                }
            }
            Err(e) => {
                let cause = format!("{:#}", e);
                error!("Snippet Library initialization error: {}", cause);
                host.error(&format!("Snippet Library failed to activate: {cause}"));
                Self {
                    store: None,
                    init_error: Some(cause),
                }
            }
        }
    }

    pub fn store(&self) -> Option<&SnippetStore> {
        self.store.as_ref()
    }

    pub fn init_error(&self) -> Option<&str> {
        self.init_error.as_deref()
    }

    fn report_disabled<H: Host + ?Sized>(&self, host: &mut H) {
        let cause = self.init_error.as_deref().unwrap_or("unknown error");
        host.error(&format!(
            "Snippet Library failed to initialize: {cause}. The editor is unavailable."
        ));
    }

    /// Entry point of the editor panel. False if the library is disabled.
    pub fn open_editor<H: Host + ?Sized>(&self, host: &mut H) -> bool {
        if self.store.is_none() {
            self.report_disabled(host);
            return false;
        }
        true
    }

    /// Completion candidates for the editor language. Empty if disabled.
    pub fn completions(&self, language: &str) -> Vec<Candidate> {
        match &self.store {
            Some(store) => build_candidates(store, language).collect(),
            None => Vec::new(),
        }
    }

    /// Handle one panel request. Errors never escape: they become host messages.
    pub fn dispatch<H: Host + ?Sized>(&mut self, req: Request, host: &mut H) -> Option<Response> {
        if self.store.is_none() {
            self.report_disabled(host);
            return None;
        }
        let store = self.store.as_mut()?;
        match handle(store, req, host) {
            Ok(resp) => resp,
            Err(e) => {
                error!("dispatch: {:#}", e);
                host.error(&format!("Error processing command: {:#}", e));
                None
            }
        }
    }
}

fn load_snippets(store: &SnippetStore) -> Response {
    Response::LoadSnippets(presentation_view(&store.get_all_snippets()))
}

fn handle<H: Host + ?Sized>(
    store: &mut SnippetStore,
    req: Request,
    host: &mut H,
) -> Result<Option<Response>> {
    match req {
        Request::GetSnippets => Ok(Some(load_snippets(store))),

        Request::SaveSnippet(data) => {
            let language = data.language.clone();
            match save_snippet(store, data)? {
                SaveOutcome::Rejected => {
                    host.warn("Snippet name is required.");
                    Ok(None)
                }
                SaveOutcome::UnknownLanguage => {
                    host.warn(&format!(
                        "No snippet file for language \"{language}\". Add the language first."
                    ));
                    Ok(Some(load_snippets(store)))
                }
                _ => {
                    host.info(MSG_SAVED);
                    Ok(Some(load_snippets(store)))
                }
            }
        }

        Request::DeleteSnippet(DeleteRequest { language, name }) => {
            let question = format!("Are you sure you want to delete snippet \"{name}\"?");
            if !host.confirm(&question, true) {
                return Ok(None);
            }
            if delete_snippet(store, &language, &name)? {
                host.info(MSG_DELETED);
            }
            Ok(Some(load_snippets(store)))
        }

        Request::InsertSnippet(InsertRequest { body }) => {
            let text = body.into_lines().join("\n");
            if !host.insert_snippet(&text)? {
                host.error(MSG_NO_EDITOR);
            }
            Ok(None)
        }

        Request::BackupSnippets => {
            let Some(out) = host.save_dialog(&FileFilter::json(), "Backup Snippets") else {
                return Ok(None);
            };
            backup_to_file(store, &out)?;
            host.info(MSG_BACKED_UP);
            Ok(None)
        }

        Request::RestoreSnippets => {
            if !host.confirm(MSG_RESTORE_CONFIRM, false) {
                return Ok(None);
            }
            let Some(src) = host.open_dialog(&FileFilter::json(), "Restore Snippets") else {
                return Ok(None);
            };
            match restore_from_file(store, &src) {
                Ok(_) => {
                    host.info(MSG_RESTORED);
                    Ok(Some(load_snippets(store)))
                }
                Err(e) => {
                    host.error(&format!("Error restoring snippets: {:#}", e));
                    Ok(None)
                }
            }
        }

        Request::AddLanguage => {
            let Some(token) = host.input_box(
                "Enter the language ID to add support for",
                "e.g., python, go, ruby",
            ) else {
                return Ok(None);
            };
            if token.trim().is_empty() {
                return Ok(None);
            }
            match add_language(store, &token, host)? {
                AddLanguageOutcome::AlreadyExists { language } => {
                    host.warn(&format!("Language \"{language}\" already exists."));
                    Ok(None)
                }
                AddLanguageOutcome::Rejected { reason } => {
                    host.warn(&format!("Language was not added: {reason}"));
                    Ok(None)
                }
                AddLanguageOutcome::Added { language, live } => {
                    if live {
                        host.info(&format!("Language \"{language}\" added."));
                    } else {
                        host.info(&format!(
                            "Language \"{language}\" added. Please reload window for auto-complete to work fully."
                        ));
                    }
                    Ok(Some(load_snippets(store)))
                }
            }
        }
    }
}
