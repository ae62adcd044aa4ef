use anyhow::Result;
use std::path::PathBuf;

use sniplib::{build_candidates, SnippetStore};

pub fn exec(root: PathBuf, lang: String, json: bool) -> Result<()> {
    let store = SnippetStore::open(&root)?;

    if json {
        let items: Vec<serde_json::Value> = build_candidates(&store, &lang)
            .map(|c| {
                serde_json::json!({
                    "prefix": c.prefix,
                    "label": c.label,
                    "documentation": c.documentation,
                    "insertText": c.insert_text(),
                    "global": c.scope == sniplib::Scope::Global,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let mut n = 0usize;
    for c in build_candidates(&store, &lang) {
        println!("{:<16} {}", c.prefix, c.label);
        n += 1;
    }
    if n == 0 {
        println!("(no candidates for '{}')", lang);
    }
    Ok(())
}
