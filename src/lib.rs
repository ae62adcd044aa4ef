// Модель данных и раскладка на диске
pub mod consts;
pub mod snippet;
pub mod partition;
pub mod lock;
pub mod config;
pub mod metrics;

// Store + мутации
pub mod subs;
pub mod store;
pub mod ops;

// Completion / backup-restore / представление для панели
pub mod completion;
pub mod backup;
pub mod view;

// Граница с редактором: коллабораторы и протокол запросов
pub mod host;
pub mod protocol;

// Удобные реэкспорты
pub use backup::{backup_document, backup_to_file, restore_from_file, restore_from_str, RestoreReport};
pub use completion::{build_candidates, Candidate, Scope};
pub use config::{LibraryBuilder, LibraryConfig};
pub use host::{CompletionRegistry, FileFilter, Host};
pub use ops::{add_language, delete_snippet, save_snippet, AddLanguageOutcome, SaveOutcome, SaveRequest};
pub use protocol::{Extension, Request, Response};
pub use snippet::{Body, Partition, Snapshot, Snippet};
pub use store::SnippetStore;
