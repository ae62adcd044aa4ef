//! Общие константы раскладки библиотеки сниппетов на диске.

// -------- Layout --------
/// Каталог с партициями внутри корня библиотеки: <root>/snippets/<lang>.json
pub const SNIPPETS_DIR: &str = "snippets";
pub const PARTITION_EXT: &str = "json";
pub const TMP_EXT: &str = "tmp";
/// Суффикс для сохранённых копий битых партиций: <lang>.json.corrupt-<ms>
pub const CORRUPT_SUFFIX: &str = "corrupt";

// -------- Lock --------
pub const LOCK_FILE: &str = "LOCK";

// -------- Languages --------
/// Зарезервированная партиция, чьи сниппеты применяются ко всем языкам.
pub const GLOBAL_LANGUAGE: &str = "global";
pub const GLOBAL_LABEL_SUFFIX: &str = " (Global)";

/// Пустая партиция в том виде, в каком её пишет add-language.
pub const EMPTY_PARTITION_JSON: &str = "{}";
