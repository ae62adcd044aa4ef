use anyhow::Result;
use std::path::PathBuf;

use sniplib::view::presentation_view;
use sniplib::{Partition, SnippetStore};

use super::util::first_line;

pub fn exec(root: PathBuf, lang: Option<String>, json: bool) -> Result<()> {
    let store = SnippetStore::open(&root)?;

    if let Some(lang) = lang {
        let part = store.get_snippets(&lang);
        if json {
            println!("{}", serde_json::to_string_pretty(&part)?);
        } else {
            print_partition(&lang, &part);
        }
        return Ok(());
    }

    let view = presentation_view(&store.get_all_snippets());
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for (lang, part) in &view {
            print_partition(lang, part);
        }
    }
    Ok(())
}

fn print_partition(lang: &str, part: &Partition) {
    println!("[{}] {} snippet(s)", lang, part.len());
    for (name, s) in part {
        println!("  {} (prefix '{}'): {}", name, s.prefix, first_line(&s.body));
        if !s.description.is_empty() {
            println!("      {}", s.description);
        }
    }
}
