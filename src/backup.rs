//! Backup / restore of the whole library as one JSON document.
//!
//! Backup: снапшот store целиком -> pretty JSON { lang: { name: {prefix, body, description} } }.
//! Чистый экспорт, состояние библиотеки не меняется.
//!
//! Restore (merge, не замена):
//! 1) Парсинг и валидация ВСЕГО документа до касания любых файлов. Ошибка -> отказ,
//!    ни одна партиция не изменена.
//! 2) Под эксклюзивным lock для каждого языка из документа: загрузить текущую
//!    партицию (новый язык -> пустая), наложить записи документа (документ побеждает
//!    при совпадении имени), остальные записи сохранить, записать атомарно.
//! 3) Языки, отсутствующие в документе, не трогаются. Один refresh в конце.
//!
//! Битая существующая партиция становится пустой базой слияния (как в refresh),
//! но её байты сначала копируются в <lang>.json.corrupt-<ms> (cfg.keep_corrupt).

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::lock::acquire_exclusive_lock;
use crate::metrics::{record_backup, record_partition_write, record_restore, record_restore_rejected};
use crate::ops::load_for_update;
use crate::partition::{
    ensure_partitions_dir, partition_path, validate_language, write_atomic,
    write_partition,
};
use crate::snippet::{Partition, Snapshot};
use crate::store::SnippetStore;

/// Parsed restore input: language -> partition, in document order.
pub type RestoreDocument = IndexMap<String, Partition>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub languages: usize,
    pub snippets: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Languages present in the document (merged).
    pub languages: Vec<String>,
    /// Languages that had no partition before the restore.
    pub created: Vec<String>,
    /// Entries taken from the document (inserted or overwritten).
    pub snippets_written: usize,
}

/// Serialize a snapshot as the backup document.
pub fn encode_snapshot(snap: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(snap).context("serialize backup document")
}

/// Backup document for the store's current snapshot.
pub fn backup_document(store: &SnippetStore) -> Result<String> {
    encode_snapshot(&store.get_all_snippets())
}

/// Write the backup document to `out` (atomic tmp + rename).
pub fn backup_to_file(store: &SnippetStore, out: &Path) -> Result<BackupReport> {
    let snap = store.get_all_snippets();
    let doc = encode_snapshot(&snap)?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create backup dir {}", parent.display()))?;
        }
    }
    write_atomic(out, doc.as_bytes(), store.cfg.data_fsync)
        .with_context(|| format!("write backup {}", out.display()))?;

    let report = BackupReport {
        languages: snap.len(),
        snippets: snap.values().map(|p| p.len()).sum(),
        bytes: doc.len(),
    };
    record_backup();
    info!(
        "backup: {} language(s), {} snippet(s), {} B -> {}",
        report.languages,
        report.snippets,
        report.bytes,
        out.display()
    );
    Ok(report)
}

/// Parse gate: the whole document must be an object of objects of snippet
/// records, with every language key usable as a partition file name.
pub fn parse_restore_document(text: &str) -> Result<RestoreDocument> {
    let doc: RestoreDocument =
        serde_json::from_str(text).context("parse restore document")?;
    for lang in doc.keys() {
        validate_language(lang).with_context(|| format!("restore document language '{lang}'"))?;
    }
    Ok(doc)
}

/// Merge a restore document (text) into the library.
pub fn restore_from_str(store: &mut SnippetStore, text: &str) -> Result<RestoreReport> {
    let doc = match parse_restore_document(text) {
        Ok(d) => d,
        Err(e) => {
            record_restore_rejected();
            warn!("restore: rejected, no partition touched: {:#}", e);
            return Err(e);
        }
    };
    restore_document(store, doc)
}

/// Read `path` and merge it into the library.
pub fn restore_from_file(store: &mut SnippetStore, path: &Path) -> Result<RestoreReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read restore document {}", path.display()))?;
    restore_from_str(store, &text)
}

/// Merge an already parsed document.
pub fn restore_document(store: &mut SnippetStore, doc: RestoreDocument) -> Result<RestoreReport> {
    info!("restore: start, {} language(s) in document", doc.len());
    ensure_partitions_dir(&store.root)?;

    let mut report = RestoreReport::default();
    {
        let _lock = acquire_exclusive_lock(&store.root)?;

        // Сначала строим все слитые партиции, потом пишем: ошибки загрузки
        // (например, сохранение битого файла) не оставляют половину записанной.
        let mut planned: Vec<(std::path::PathBuf, Partition)> = Vec::with_capacity(doc.len());
        for (lang, incoming) in doc {
            let path = partition_path(&store.root, &lang);
            let existed = path.exists();
            let mut merged = load_for_update(store, &lang, &path)?;

            report.snippets_written += incoming.len();
            for (name, snippet) in incoming {
                merged.insert(name, snippet);
            }
            debug!(
                "restore: '{}' -> {} entr(ies){}",
                lang,
                merged.len(),
                if existed { "" } else { " (new)" }
            );

            if !existed {
                report.created.push(lang.clone());
            }
            report.languages.push(lang);
            planned.push((path, merged));
        }

        for (path, merged) in &planned {
            write_partition(path, merged, store.cfg.data_fsync)?;
            record_partition_write();
        }
    }

    store.refresh()?;
    record_restore(report.snippets_written);
    info!(
        "restore: done, languages={}, created={}, snippets={}",
        report.languages.len(),
        report.created.len(),
        report.snippets_written
    );
    Ok(report)
}
