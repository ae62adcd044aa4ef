//! Lightweight global metrics for sniplib.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Store (refresh, partitions loaded, malformed partitions)
//! - Mutations (save/rename/delete/add-language)
//! - Completion
//! - Backup / Restore

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Store -----
static STORE_REFRESHES: AtomicU64 = AtomicU64::new(0);
static PARTITIONS_LOADED: AtomicU64 = AtomicU64::new(0);
static PARTITIONS_MALFORMED: AtomicU64 = AtomicU64::new(0);

// ----- Mutations -----
static SNIPPETS_SAVED: AtomicU64 = AtomicU64::new(0);
static SNIPPETS_RENAMED: AtomicU64 = AtomicU64::new(0);
static SNIPPETS_DELETED: AtomicU64 = AtomicU64::new(0);
static LANGUAGES_ADDED: AtomicU64 = AtomicU64::new(0);
static PARTITION_WRITES: AtomicU64 = AtomicU64::new(0);

// ----- Completion -----
static CANDIDATE_BUILDS: AtomicU64 = AtomicU64::new(0);

// ----- Backup / Restore -----
static BACKUPS_TOTAL: AtomicU64 = AtomicU64::new(0);
static RESTORES_TOTAL: AtomicU64 = AtomicU64::new(0);
static RESTORES_REJECTED: AtomicU64 = AtomicU64::new(0);
static RESTORE_SNIPPETS_WRITTEN: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub store_refreshes: u64,
    pub partitions_loaded: u64,
    pub partitions_malformed: u64,

    pub snippets_saved: u64,
    pub snippets_renamed: u64,
    pub snippets_deleted: u64,
    pub languages_added: u64,
    pub partition_writes: u64,

    pub candidate_builds: u64,

    pub backups_total: u64,
    pub restores_total: u64,
    pub restores_rejected: u64,
    pub restore_snippets_written: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "store_refreshes": self.store_refreshes,
            "partitions_loaded": self.partitions_loaded,
            "partitions_malformed": self.partitions_malformed,
            "snippets_saved": self.snippets_saved,
            "snippets_renamed": self.snippets_renamed,
            "snippets_deleted": self.snippets_deleted,
            "languages_added": self.languages_added,
            "partition_writes": self.partition_writes,
            "candidate_builds": self.candidate_builds,
            "backups_total": self.backups_total,
            "restores_total": self.restores_total,
            "restores_rejected": self.restores_rejected,
            "restore_snippets_written": self.restore_snippets_written,
        })
    }
}

pub fn metrics_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        store_refreshes: STORE_REFRESHES.load(Ordering::Relaxed),
        partitions_loaded: PARTITIONS_LOADED.load(Ordering::Relaxed),
        partitions_malformed: PARTITIONS_MALFORMED.load(Ordering::Relaxed),
        snippets_saved: SNIPPETS_SAVED.load(Ordering::Relaxed),
        snippets_renamed: SNIPPETS_RENAMED.load(Ordering::Relaxed),
        snippets_deleted: SNIPPETS_DELETED.load(Ordering::Relaxed),
        languages_added: LANGUAGES_ADDED.load(Ordering::Relaxed),
        partition_writes: PARTITION_WRITES.load(Ordering::Relaxed),
        candidate_builds: CANDIDATE_BUILDS.load(Ordering::Relaxed),
        backups_total: BACKUPS_TOTAL.load(Ordering::Relaxed),
        restores_total: RESTORES_TOTAL.load(Ordering::Relaxed),
        restores_rejected: RESTORES_REJECTED.load(Ordering::Relaxed),
        restore_snippets_written: RESTORE_SNIPPETS_WRITTEN.load(Ordering::Relaxed),
    }
}

pub fn metrics_reset() {
    for c in [
        &STORE_REFRESHES,
        &PARTITIONS_LOADED,
        &PARTITIONS_MALFORMED,
        &SNIPPETS_SAVED,
        &SNIPPETS_RENAMED,
        &SNIPPETS_DELETED,
        &LANGUAGES_ADDED,
        &PARTITION_WRITES,
        &CANDIDATE_BUILDS,
        &BACKUPS_TOTAL,
        &RESTORES_TOTAL,
        &RESTORES_REJECTED,
        &RESTORE_SNIPPETS_WRITTEN,
    ] {
        c.store(0, Ordering::Relaxed);
    }
}

// ----- recorders -----

pub fn record_store_refresh(partitions: usize) {
    STORE_REFRESHES.fetch_add(1, Ordering::Relaxed);
    PARTITIONS_LOADED.fetch_add(partitions as u64, Ordering::Relaxed);
}

pub fn record_partition_malformed() {
    PARTITIONS_MALFORMED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_snippet_saved(renamed: bool) {
    SNIPPETS_SAVED.fetch_add(1, Ordering::Relaxed);
    if renamed {
        SNIPPETS_RENAMED.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_snippet_deleted() {
    SNIPPETS_DELETED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_language_added() {
    LANGUAGES_ADDED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_partition_write() {
    PARTITION_WRITES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_candidate_build() {
    CANDIDATE_BUILDS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_backup() {
    BACKUPS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_restore(snippets_written: usize) {
    RESTORES_TOTAL.fetch_add(1, Ordering::Relaxed);
    RESTORE_SNIPPETS_WRITTEN.fetch_add(snippets_written as u64, Ordering::Relaxed);
}

pub fn record_restore_rejected() {
    RESTORES_REJECTED.fetch_add(1, Ordering::Relaxed);
}
