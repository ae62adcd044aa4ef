use anyhow::Result;
use std::path::PathBuf;

use sniplib::partition::partitions_dir;
use sniplib::SnippetStore;

pub fn exec(root: PathBuf) -> Result<()> {
    let store = SnippetStore::open(&root)?;
    println!(
        "init: OK (root={}, snippets_dir={}, languages={})",
        root.display(),
        partitions_dir(&root).display(),
        store.language_ids().len()
    );
    Ok(())
}
