// tests/completion.rs
//
// Порядок кандидатов, метки global, алиасы и свежесть после мутаций.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use sniplib::config::LibraryConfig;
use sniplib::partition::{partition_path, partitions_dir};
use sniplib::{build_candidates, save_snippet, Body, SaveRequest, Scope, SnippetStore};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sniplib-compl-{prefix}-{pid}-{t}"))
}

fn seed(root: &PathBuf, files: &[(&str, &str)]) -> Result<()> {
    fs::create_dir_all(partitions_dir(root))?;
    for (lang, json) in files {
        fs::write(partition_path(root, lang), json)?;
    }
    Ok(())
}

fn labels(store: &SnippetStore, lang: &str) -> Vec<String> {
    build_candidates(store, lang).map(|c| c.label).collect()
}

#[test]
fn language_entries_then_global_with_suffix() -> Result<()> {
    let root = unique_root("order");
    seed(
        &root,
        &[
            ("rust", r#"{"foo":{"prefix":"f","body":["foo()"],"description":"Foo"}}"#),
            ("global", r#"{"bar":{"prefix":"b","body":["bar","baz"],"description":"Bar"}}"#),
        ],
    )?;
    let store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;

    let c: Vec<_> = build_candidates(&store, "rust").collect();
    assert_eq!(c.len(), 2);

    assert_eq!(c[0].label, "foo");
    assert_eq!(c[0].prefix, "f");
    assert_eq!(c[0].documentation, "Foo");
    assert_eq!(c[0].scope, Scope::Language);
    assert_eq!(c[0].insert_text(), "foo()");

    assert_eq!(c[1].label, "bar (Global)");
    assert_eq!(c[1].prefix, "b");
    assert_eq!(c[1].scope, Scope::Global);
    assert_eq!(c[1].insert_text(), "bar\nbaz");
    Ok(())
}

#[test]
fn same_name_in_language_and_global_gives_two_candidates() -> Result<()> {
    let root = unique_root("dup");
    seed(
        &root,
        &[
            ("go", r#"{"log":{"prefix":"log","body":["log.Println($0)"]}}"#),
            ("global", r#"{"log":{"prefix":"log","body":["console.log($0)"]}}"#),
        ],
    )?;
    let store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;
    assert_eq!(labels(&store, "go"), vec!["log", "log (Global)"]);
    Ok(())
}

#[test]
fn unknown_language_yields_only_global() -> Result<()> {
    let root = unique_root("unknown");
    seed(&root, &[("global", r#"{"g":{"prefix":"g","body":["g"]}}"#)])?;
    let store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;
    assert_eq!(labels(&store, "haskell"), vec!["g (Global)"]);
    Ok(())
}

#[test]
fn empty_library_yields_nothing() -> Result<()> {
    let root = unique_root("empty");
    let store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;
    assert_eq!(build_candidates(&store, "rust").count(), 0);
    Ok(())
}

#[test]
fn global_target_lists_global_twice() -> Result<()> {
    let root = unique_root("global-target");
    seed(&root, &[("global", r#"{"g":{"prefix":"g","body":["g"]}}"#)])?;
    let store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;
    assert_eq!(labels(&store, "global"), vec!["g", "g (Global)"]);
    Ok(())
}

#[test]
fn alias_resolves_to_base_language() -> Result<()> {
    let root = unique_root("alias");
    seed(&root, &[("javascript", r#"{"cl":{"prefix":"cl","body":["console.log()"]}}"#)])?;

    let store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;
    assert_eq!(labels(&store, "javascriptreact"), vec!["cl"]);

    let plain = unique_root("alias-off");
    seed(&plain, &[("javascript", r#"{"cl":{"prefix":"cl","body":["console.log()"]}}"#)])?;
    let store = SnippetStore::open_with_config(&plain, LibraryConfig::default().without_aliases())?;
    assert!(labels(&store, "javascriptreact").is_empty());
    Ok(())
}

#[test]
fn candidates_reflect_latest_save() -> Result<()> {
    let root = unique_root("fresh");
    seed(&root, &[("rust", "{}")])?;
    let mut store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;
    assert!(labels(&store, "rust").is_empty());

    save_snippet(
        &mut store,
        SaveRequest {
            language: "rust".into(),
            original_name: None,
            new_name: "test".into(),
            prefix: "tst".into(),
            description: String::new(),
            body: Body::from("#[test]\nfn $1() {}"),
        },
    )?;
    let c: Vec<_> = build_candidates(&store, "rust").collect();
    assert_eq!(c.len(), 1);
    assert_eq!(c[0].body, vec!["#[test]", "fn $1() {}"]);
    Ok(())
}

#[test]
fn iterator_keeps_snapshot_taken_at_call() -> Result<()> {
    let root = unique_root("stable");
    seed(&root, &[("rust", r#"{"a":{"prefix":"a","body":["a"]}}"#)])?;
    let mut store = SnippetStore::open_with_config(&root, LibraryConfig::default())?;

    let it = build_candidates(&store, "rust");
    fs::write(partition_path(&root, "rust"), "{}")?;
    store.refresh()?;

    assert_eq!(it.count(), 1);
    assert!(labels(&store, "rust").is_empty());
    Ok(())
}
