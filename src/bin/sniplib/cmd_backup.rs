use anyhow::{Context, Result};
use std::path::PathBuf;

use sniplib::{backup_to_file, SnippetStore};

pub fn exec(root: PathBuf, out: PathBuf) -> Result<()> {
    let store = SnippetStore::open(&root)?;
    let r = backup_to_file(&store, &out)
        .with_context(|| format!("backup {} to {}", root.display(), out.display()))?;
    println!(
        "backup: OK (languages={}, snippets={}, bytes={}, out={})",
        r.languages,
        r.snippets,
        r.bytes,
        out.display()
    );
    Ok(())
}
