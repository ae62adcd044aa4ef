//! partition: one language = one JSON file under <root>/snippets/.
//!
//! Формат файла: UTF-8 JSON-объект name -> {prefix, body: [string], description}.
//! Запись атомарная: tmp + rename (как registry.json / манифесты).
//!
//! Чтение бывает двух видов:
//! - lenient (store refresh): битый файл -> пустая партиция + warn!;
//! - load (мутации/restore): возвращает PartitionLoad, чтобы вызывающий мог
//!   сохранить сырые байты битого файла прежде чем перезаписать его.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::{CORRUPT_SUFFIX, EMPTY_PARTITION_JSON, PARTITION_EXT, SNIPPETS_DIR, TMP_EXT};
use crate::metrics::record_partition_malformed;
use indexmap::IndexMap;
use serde_json::Value;

use crate::snippet::{snippet_from_value, Partition};

/// Result of loading one partition file.
#[derive(Debug)]
pub enum PartitionLoad {
    /// No file for this language.
    Missing,
    Loaded(Partition),
    /// File exists but could not be read/parsed. `raw` is whatever bytes were readable.
    Malformed { raw: Vec<u8>, reason: String },
}

impl PartitionLoad {
    /// Malformed and missing both degrade to an empty partition.
    pub fn into_partition(self) -> Partition {
        match self {
            PartitionLoad::Loaded(p) => p,
            PartitionLoad::Missing | PartitionLoad::Malformed { .. } => Partition::new(),
        }
    }

    pub fn exists(&self) -> bool {
        !matches!(self, PartitionLoad::Missing)
    }
}

pub fn partitions_dir(root: &Path) -> PathBuf {
    root.join(SNIPPETS_DIR)
}

/// <root>/snippets/<lang>.json (language must already be validated).
pub fn partition_path(root: &Path, language: &str) -> PathBuf {
    partitions_dir(root).join(format!("{language}.{PARTITION_EXT}"))
}

/// Lowercase + trim, as add-language and restore treat user tokens.
pub fn normalize_language(token: &str) -> String {
    token.trim().to_lowercase()
}

/// A language id must be usable as a file stem inside the snippets dir.
pub fn validate_language(language: &str) -> Result<()> {
    if language.is_empty() {
        bail!("language id is empty");
    }
    if language.starts_with('.')
        || language.contains(['/', '\\', '\0'])
        || language.contains("..")
    {
        bail!("language id '{}' is not a valid file name", language);
    }
    Ok(())
}

/// Create <root>/snippets if missing.
pub fn ensure_partitions_dir(root: &Path) -> Result<PathBuf> {
    let dir = partitions_dir(root);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("create snippets dir {}", dir.display()))?;
    }
    Ok(dir)
}

/// Все *.json в каталоге партиций: язык (имя файла без расширения) -> путь.
pub fn discover_partitions(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let dir = partitions_dir(root);
    let mut out = BTreeMap::new();
    if !dir.exists() {
        return Ok(out);
    }
    for e in fs::read_dir(&dir).with_context(|| format!("read_dir {}", dir.display()))? {
        let p = e?.path();
        if !p.is_file() {
            continue;
        }
        if p.extension().map(|ext| ext == PARTITION_EXT).unwrap_or(false) {
            if let Some(stem) = p.file_stem().and_then(|s| s.to_str()) {
                // Язык должен быть тем же id, что принимают add-language и restore.
                if let Err(e) = validate_language(stem) {
                    warn!("partition: skipping {}: {}", p.display(), e);
                    continue;
                }
                out.insert(stem.to_string(), p.clone());
            }
        }
    }
    Ok(out)
}

/// Load a partition file, keeping malformed content distinguishable from "missing".
pub fn load_partition(path: &Path) -> PartitionLoad {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return PartitionLoad::Missing,
        Err(e) => {
            return PartitionLoad::Malformed {
                raw: Vec::new(),
                reason: format!("read {}: {}", path.display(), e),
            }
        }
    };
    match serde_json::from_slice::<IndexMap<String, Value>>(&bytes) {
        Ok(records) => PartitionLoad::Loaded(decode_records(path, records)),
        Err(e) => PartitionLoad::Malformed {
            raw: bytes,
            reason: format!("parse {}: {}", path.display(), e),
        },
    }
}

/// Per-record decoding: a record that is not an object is dropped with a warning,
/// the rest of the partition stays usable.
fn decode_records(path: &Path, records: IndexMap<String, Value>) -> Partition {
    let mut out = Partition::with_capacity(records.len());
    for (name, v) in records {
        match snippet_from_value(v) {
            Some(s) => {
                out.insert(name, s);
            }
            None => warn!("partition: {}: record '{}' is not a snippet, skipped", path.display(), name),
        }
    }
    out
}

/// Lenient load used by refresh: malformed -> empty, logged, never fatal.
pub fn load_partition_lenient(language: &str, path: &Path) -> Partition {
    match load_partition(path) {
        PartitionLoad::Loaded(p) => p,
        PartitionLoad::Missing => Partition::new(),
        PartitionLoad::Malformed { reason, .. } => {
            warn!("store: partition '{}' treated as empty: {}", language, reason);
            record_partition_malformed();
            Partition::new()
        }
    }
}

/// Serialize a partition the way it is stored on disk (pretty, 2-space indent).
pub fn encode_partition(p: &Partition) -> Result<String> {
    serde_json::to_string_pretty(p).context("serialize partition")
}

/// Atomic write: <path>.tmp then rename over <path>.
pub fn write_atomic(path: &Path, data: &[u8], fsync: bool) -> Result<()> {
    let tmp = path.with_extension(format!("{PARTITION_EXT}.{TMP_EXT}"));
    {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .with_context(|| format!("open {}", tmp.display()))?;
        f.write_all(data)
            .with_context(|| format!("write {}", tmp.display()))?;
        f.flush()?;
        if fsync {
            f.sync_all()
                .with_context(|| format!("fsync {}", tmp.display()))?;
        }
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

pub fn write_partition(path: &Path, p: &Partition, fsync: bool) -> Result<()> {
    let json = encode_partition(p)?;
    write_atomic(path, json.as_bytes(), fsync)?;
    debug!("partition: wrote {} entr(ies) to {}", p.len(), path.display());
    Ok(())
}

pub fn write_empty_partition(path: &Path, fsync: bool) -> Result<()> {
    write_atomic(path, EMPTY_PARTITION_JSON.as_bytes(), fsync)
}

/// Copy malformed bytes to <path>.corrupt-<ms> so an overwrite does not lose them.
pub fn preserve_corrupt(path: &Path, raw: &[u8]) -> Result<PathBuf> {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("bad partition path {}", path.display()))?;
    let dst = path.with_file_name(format!("{file_name}.{CORRUPT_SUFFIX}-{ms}"));
    fs::write(&dst, raw).with_context(|| format!("write {}", dst.display()))?;
    warn!(
        "partition: malformed {} preserved as {}",
        path.display(),
        dst.display()
    );
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_validation() {
        assert!(validate_language("rust").is_ok());
        assert!(validate_language("c++").is_ok());
        assert!(validate_language("").is_err());
        assert!(validate_language("../etc").is_err());
        assert!(validate_language("a/b").is_err());
        assert!(validate_language(".hidden").is_err());
    }

    #[test]
    fn bad_record_does_not_hide_good_ones() {
        let dir = std::env::temp_dir().join(format!(
            "sniplib-part-{}-{}",
            std::process::id(),
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rust.json");
        fs::write(
            &path,
            r#"{"good":{"prefix":"g","body":["ok"]},"nulls":{"prefix":"b","body":null},"junk":42}"#,
        )
        .unwrap();

        let p = load_partition_lenient("rust", &path);
        let names: Vec<&str> = p.keys().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["good", "nulls"]);
        assert_eq!(p["good"].body, vec!["ok"]);
        assert!(p["nulls"].body.is_empty());
    }

    #[test]
    fn discovery_skips_stems_that_are_not_language_ids() {
        let root = std::env::temp_dir().join(format!(
            "sniplib-disc-{}-{}",
            std::process::id(),
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
        ));
        let dir = ensure_partitions_dir(&root).unwrap();
        fs::write(dir.join("rust.json"), "{}").unwrap();
        fs::write(dir.join(".vscode.json"), "{}").unwrap();

        let found = discover_partitions(&root).unwrap();
        assert_eq!(found.keys().cloned().collect::<Vec<_>>(), vec!["rust".to_string()]);
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_language("  Python \n"), "python");
    }
}
