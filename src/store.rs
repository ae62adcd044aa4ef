//! store: SnippetStore: владелец снапшота библиотеки.
//!
//! - open(): создаёт <root>/snippets при необходимости и делает первый refresh.
//! - refresh(): под shared lock перечитывает ВСЕ партиции и заменяет снапшот целиком (Arc swap);
//!   битая партиция -> пустая (warn!), остальные продолжают читаться.
//! - Снапшот никогда не патчится на месте: мутации пишут файлы и вызывают refresh().
//! - После refresh публикуется RefreshEvent подписчикам (subs).

use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::LibraryConfig;
use crate::lock::acquire_shared_lock;
use crate::metrics::record_store_refresh;
use crate::partition::{
    discover_partitions, ensure_partitions_dir, load_partition_lenient, partition_path,
    validate_language,
};
use crate::snippet::{Partition, Snapshot};
use crate::subs::{Callback, RefreshEvent, SubRegistry, SubscriptionHandle};

pub struct SnippetStore {
    pub root: PathBuf,
    pub cfg: LibraryConfig,
    snapshot: Arc<Snapshot>,
    files: BTreeMap<String, PathBuf>,
    generation: u64,
    subs: Arc<SubRegistry>,
}

impl SnippetStore {
    /// Open with configuration from env.
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with_config(root, LibraryConfig::from_env())
    }

    pub fn open_with_config(root: &Path, cfg: LibraryConfig) -> Result<Self> {
        if !root.exists() {
            fs::create_dir_all(root)
                .with_context(|| format!("create library root {}", root.display()))?;
        }
        ensure_partitions_dir(root)?;

        let mut store = Self {
            root: root.to_path_buf(),
            cfg,
            snapshot: Arc::new(Snapshot::new()),
            files: BTreeMap::new(),
            generation: 0,
            subs: SubRegistry::new(),
        };
        store.refresh()?;
        info!(
            "store: opened {} ({} language(s)), {}",
            store.root.display(),
            store.files.len(),
            store.cfg
        );
        Ok(store)
    }

    /// Rebuild the snapshot from disk and swap it in.
    pub fn refresh(&mut self) -> Result<()> {
        let (files, snap) = {
            let _lock = acquire_shared_lock(&self.root)?;
            let files = discover_partitions(&self.root)?;
            let mut snap = Snapshot::new();
            for (lang, path) in &files {
                snap.insert(lang.clone(), load_partition_lenient(lang, path));
            }
            (files, snap)
        };

        // Новый снапшот собирается полностью и только потом подменяет старый.
        self.snapshot = Arc::new(snap);
        self.files = files;
        self.generation += 1;
        record_store_refresh(self.files.len());
        debug!(
            "store: refresh gen={} languages={}",
            self.generation,
            self.files.len()
        );

        let ev = RefreshEvent {
            generation: self.generation,
            languages: self.language_ids(),
            snapshot: Arc::clone(&self.snapshot),
        };
        self.subs.publish(&ev);
        Ok(())
    }

    /// Partition for a language, or empty. Never fails.
    pub fn get_snippets(&self, language: &str) -> Partition {
        self.snapshot.get(language).cloned().unwrap_or_default()
    }

    /// Shared handle to the current snapshot.
    pub fn get_all_snippets(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Languages with a persisted partition (as of the last refresh).
    pub fn language_ids(&self) -> BTreeSet<String> {
        self.files.keys().cloned().collect()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Path of the persisted unit for `language` if it exists right now on disk.
    pub fn partition_file(&self, language: &str) -> Option<PathBuf> {
        if validate_language(language).is_err() {
            return None;
        }
        let p = partition_path(&self.root, language);
        if p.is_file() {
            Some(p)
        } else {
            None
        }
    }

    pub fn subscribe(&self, cb: Callback) -> SubscriptionHandle {
        self.subs.subscribe(cb)
    }
}
