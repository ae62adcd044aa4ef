use anyhow::{bail, Result};
use std::path::PathBuf;

use sniplib::{add_language, AddLanguageOutcome, CompletionRegistry, SnippetStore};

/// CLI has no running completion provider: registration always needs a host reload.
struct OfflineRegistry;

impl CompletionRegistry for OfflineRegistry {
    fn register_completion(&mut self, languages: &[String]) -> Result<bool> {
        log::debug!("add-lang: completion languages now {:?}", languages);
        Ok(false)
    }
}

pub fn exec(root: PathBuf, lang: String) -> Result<()> {
    let mut store = SnippetStore::open(&root)?;
    match add_language(&mut store, &lang, &mut OfflineRegistry)? {
        AddLanguageOutcome::Added { language, .. } => {
            println!("ADDED language '{}'", language)
        }
        AddLanguageOutcome::AlreadyExists { language } => {
            println!("language '{}' already exists", language)
        }
        AddLanguageOutcome::Rejected { reason } => bail!("add-lang: {}", reason),
    }
    Ok(())
}
