use anyhow::Result;
use std::path::PathBuf;

use sniplib::{delete_snippet, SnippetStore};

use super::util::confirm_tty;

pub fn exec(root: PathBuf, lang: String, name: String, yes: bool) -> Result<()> {
    // Подтверждение до открытия store: отказ ничего не трогает.
    if !yes && !confirm_tty(&format!("Are you sure you want to delete snippet \"{}\"?", name))? {
        println!("delete: cancelled");
        return Ok(());
    }

    let mut store = SnippetStore::open(&root)?;
    if delete_snippet(&mut store, &lang, &name)? {
        println!("DELETED '{}/{}'", lang, name);
    } else {
        println!("DELETE requested, but '{}/{}' does not exist", lang, name);
    }
    Ok(())
}
