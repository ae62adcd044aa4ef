use anyhow::{Context, Result};
use std::path::PathBuf;

use sniplib::protocol::MSG_RESTORE_CONFIRM;
use sniplib::{restore_from_file, SnippetStore};

use super::util::confirm_tty;

/// CLI: restore, слить документ бэкапа в библиотеку.
///
/// Языки из документа: записи документа перезаписывают одноимённые, прочие
/// записи партиции сохраняются. Языки вне документа не трогаются.
/// Неразборчивый документ даёт ошибку, ни один файл не изменён.
pub fn exec(root: PathBuf, from: PathBuf, yes: bool) -> Result<()> {
    if !yes && !confirm_tty(MSG_RESTORE_CONFIRM)? {
        println!("restore: cancelled");
        return Ok(());
    }

    let mut store = SnippetStore::open(&root)?;
    let r = restore_from_file(&mut store, &from)
        .with_context(|| format!("restore {} from {}", root.display(), from.display()))?;

    println!(
        "restore: OK (languages={}, created={}, snippets={})",
        r.languages.len(),
        r.created.len(),
        r.snippets_written
    );
    if !r.created.is_empty() {
        println!("new languages: {}", r.created.join(", "));
    }
    Ok(())
}
