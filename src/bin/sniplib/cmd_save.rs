use anyhow::{bail, Result};
use std::path::PathBuf;

use sniplib::{save_snippet, Body, SaveOutcome, SaveRequest, SnippetStore};

use super::util::decode_text_arg;

pub fn exec(
    root: PathBuf,
    lang: String,
    name: String,
    original: Option<String>,
    prefix: String,
    description: String,
    body: String,
) -> Result<()> {
    let mut store = SnippetStore::open(&root)?;
    let body = decode_text_arg(&body)?;

    let req = SaveRequest {
        language: lang.clone(),
        original_name: original,
        new_name: name.clone(),
        prefix,
        description,
        body: Body::Text(body),
    };
    match save_snippet(&mut store, req)? {
        SaveOutcome::Created => println!("CREATED '{}/{}'", lang, name),
        SaveOutcome::Updated => println!("UPDATED '{}/{}'", lang, name),
        SaveOutcome::Renamed { from } => println!("RENAMED '{}/{}' -> '{}'", lang, from, name),
        SaveOutcome::Rejected => bail!("snippet name must not be empty"),
        SaveOutcome::UnknownLanguage => {
            println!(
                "SKIPPED: no partition for language '{}' (run add-lang first)",
                lang
            )
        }
    }
    Ok(())
}
