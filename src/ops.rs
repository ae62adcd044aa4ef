//! ops: мутации библиотеки: save (create/update/rename), delete, add-language.
//!
//! Общая схема каждой мутации:
//!   exclusive lock -> load partition -> modify -> atomic write -> unlock -> store.refresh()
//! Если запись не удалась, refresh не выполняется и ошибка пробрасывается.

use anyhow::{bail, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::consts::GLOBAL_LANGUAGE;
use crate::host::CompletionRegistry;
use crate::lock::acquire_exclusive_lock;
use crate::metrics::{
    record_language_added, record_partition_write, record_snippet_deleted, record_snippet_saved,
};
use crate::partition::{
    ensure_partitions_dir, load_partition, normalize_language, partition_path, preserve_corrupt,
    validate_language, write_empty_partition, write_partition, PartitionLoad,
};
use crate::snippet::{Body, Partition, Snippet};
use crate::store::SnippetStore;

/// Save payload (the editor form). Field names follow the panel protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub language: String,
    #[serde(default)]
    pub original_name: Option<String>,
    pub new_name: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
    /// `from` was removed and the entry re-inserted under the new name.
    Renamed { from: String },
    /// Empty name: nothing written.
    Rejected,
    /// No partition for the language and it is not `global`: nothing written.
    UnknownLanguage,
}

impl SaveOutcome {
    pub fn is_written(&self) -> bool {
        matches!(
            self,
            SaveOutcome::Created | SaveOutcome::Updated | SaveOutcome::Renamed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddLanguageOutcome {
    /// Partition created. `live` is false if the host needs a reload to serve completions.
    Added { language: String, live: bool },
    AlreadyExists { language: String },
    Rejected { reason: String },
}

/// Load for read-modify-write; a malformed file becomes the empty base,
/// optionally after its bytes are copied aside.
pub(crate) fn load_for_update(
    store: &SnippetStore,
    language: &str,
    path: &std::path::Path,
) -> Result<Partition> {
    match load_partition(path) {
        PartitionLoad::Loaded(p) => Ok(p),
        PartitionLoad::Missing => Ok(Partition::new()),
        PartitionLoad::Malformed { raw, reason } => {
            warn!("ops: partition '{}' is malformed, using empty base: {}", language, reason);
            if store.cfg.keep_corrupt && !raw.is_empty() {
                preserve_corrupt(path, &raw)?;
            }
            Ok(Partition::new())
        }
    }
}

/// Create, update or rename a snippet.
pub fn save_snippet(store: &mut SnippetStore, req: SaveRequest) -> Result<SaveOutcome> {
    let SaveRequest {
        language,
        original_name,
        new_name,
        prefix,
        description,
        body,
    } = req;

    if new_name.trim().is_empty() {
        warn!("save: rejected empty snippet name (language='{}')", language);
        return Ok(SaveOutcome::Rejected);
    }

    let path = match store.partition_file(&language) {
        Some(p) => p,
        None if language == GLOBAL_LANGUAGE => {
            ensure_partitions_dir(&store.root)?;
            partition_path(&store.root, GLOBAL_LANGUAGE)
        }
        None => {
            if store.cfg.strict_paths {
                bail!("no snippet file for language '{}'", language);
            }
            warn!("save: no partition for language '{}', skipped", language);
            return Ok(SaveOutcome::UnknownLanguage);
        }
    };

    let outcome = {
        let _lock = acquire_exclusive_lock(&store.root)?;
        let mut snippets = load_for_update(store, &language, &path)?;

        let mut outcome = if snippets.contains_key(&new_name) {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        };
        if let Some(orig) = original_name.filter(|o| !o.is_empty() && *o != new_name) {
            if snippets.shift_remove(&orig).is_some() {
                outcome = SaveOutcome::Renamed { from: orig };
            }
        }

        snippets.insert(new_name.clone(), Snippet::new(prefix, body, description));
        write_partition(&path, &snippets, store.cfg.data_fsync)?;
        record_partition_write();
        outcome
    };

    record_snippet_saved(matches!(outcome, SaveOutcome::Renamed { .. }));
    info!("save: {}/{} -> {:?}", language, new_name, outcome);
    store.refresh()?;
    Ok(outcome)
}

/// Remove a snippet. Returns false (and writes nothing) when the language,
/// the file contents or the name are missing.
pub fn delete_snippet(store: &mut SnippetStore, language: &str, name: &str) -> Result<bool> {
    let Some(path) = store.partition_file(language) else {
        return Ok(false);
    };

    {
        let _lock = acquire_exclusive_lock(&store.root)?;
        let mut snippets = match load_partition(&path) {
            PartitionLoad::Loaded(p) => p,
            PartitionLoad::Missing => return Ok(false),
            PartitionLoad::Malformed { reason, .. } => {
                // Битый файл не трогаем: удалять в нём нечего.
                warn!("delete: partition '{}' unreadable: {}", language, reason);
                return Ok(false);
            }
        };
        if snippets.shift_remove(name).is_none() {
            return Ok(false);
        }
        write_partition(&path, &snippets, store.cfg.data_fsync)?;
        record_partition_write();
    }

    record_snippet_deleted();
    info!("delete: {}/{}", language, name);
    store.refresh()?;
    Ok(true)
}

/// Create an empty partition for a user-supplied token and register the new
/// language set for completions.
pub fn add_language<R>(
    store: &mut SnippetStore,
    token: &str,
    registry: &mut R,
) -> Result<AddLanguageOutcome>
where
    R: CompletionRegistry + ?Sized,
{
    let language = normalize_language(token);
    if let Err(e) = validate_language(&language) {
        return Ok(AddLanguageOutcome::Rejected {
            reason: e.to_string(),
        });
    }

    ensure_partitions_dir(&store.root)?;
    let path = partition_path(&store.root, &language);
    {
        let _lock = acquire_exclusive_lock(&store.root)?;
        if path.exists() {
            return Ok(AddLanguageOutcome::AlreadyExists { language });
        }
        write_empty_partition(&path, store.cfg.data_fsync)?;
        record_partition_write();
    }

    record_language_added();
    store.refresh()?;

    let languages: Vec<String> = store.language_ids().into_iter().collect();
    let live = registry.register_completion(&languages)?;
    info!("add-language: '{}' (live registration: {})", language, live);
    Ok(AddLanguageOutcome::Added { language, live })
}
