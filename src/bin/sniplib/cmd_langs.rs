use anyhow::Result;
use std::path::PathBuf;

use sniplib::SnippetStore;

pub fn exec(root: PathBuf, json: bool) -> Result<()> {
    let store = SnippetStore::open(&root)?;
    let langs = store.language_ids();
    if json {
        println!("{}", serde_json::to_string(&langs)?);
        return Ok(());
    }
    if langs.is_empty() {
        println!("(no languages)");
    }
    for lang in &langs {
        println!("{} ({} snippet(s))", lang, store.get_snippets(lang).len());
    }
    Ok(())
}
