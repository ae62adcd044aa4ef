// tests/protocol.rs
//
// Протокол панели через записывающий Host: парсинг запросов, подтверждения,
// сообщения пользователю, отказ инициализации.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use sniplib::config::LibraryConfig;
use sniplib::host::{CompletionRegistry, FileFilter, Host};
use sniplib::partition::{partition_path, partitions_dir};
use sniplib::protocol::{
    DeleteRequest, InsertRequest, MSG_BACKED_UP, MSG_DELETED, MSG_NO_EDITOR, MSG_RESTORED,
    MSG_SAVED,
};
use sniplib::{Body, Extension, Request, Response};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sniplib-proto-{prefix}-{pid}-{t}"))
}

fn seed(root: &Path, files: &[(&str, &str)]) -> Result<()> {
    fs::create_dir_all(partitions_dir(root))?;
    for (lang, json) in files {
        fs::write(partition_path(root, lang), json)?;
    }
    Ok(())
}

/// Host с заранее заданными ответами; всё, что ему говорят, записывается.
#[derive(Default)]
struct RecordingHost {
    confirms: VecDeque<bool>,
    paths: VecDeque<Option<PathBuf>>,
    inputs: VecDeque<Option<String>>,
    has_editor: bool,
    live_registration: bool,

    asked: Vec<(String, bool)>,
    inserted: Vec<String>,
    registered: Vec<Vec<String>>,
    infos: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl CompletionRegistry for RecordingHost {
    fn register_completion(&mut self, languages: &[String]) -> Result<bool> {
        self.registered.push(languages.to_vec());
        Ok(self.live_registration)
    }
}

impl Host for RecordingHost {
    fn confirm(&mut self, message: &str, modal: bool) -> bool {
        self.asked.push((message.to_string(), modal));
        self.confirms.pop_front().unwrap_or(false)
    }

    fn save_dialog(&mut self, _filter: &FileFilter, _label: &str) -> Option<PathBuf> {
        self.paths.pop_front().flatten()
    }

    fn open_dialog(&mut self, filter: &FileFilter, _label: &str) -> Option<PathBuf> {
        assert_eq!(filter.extensions, vec!["json"]);
        self.paths.pop_front().flatten()
    }

    fn input_box(&mut self, _prompt: &str, _placeholder: &str) -> Option<String> {
        self.inputs.pop_front().flatten()
    }

    fn insert_snippet(&mut self, text: &str) -> Result<bool> {
        if !self.has_editor {
            return Ok(false);
        }
        self.inserted.push(text.to_string());
        Ok(true)
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn loaded(resp: Option<Response>) -> sniplib::Snapshot {
    match resp {
        Some(Response::LoadSnippets(s)) => s,
        None => panic!("expected loadSnippets response"),
    }
}

#[test]
fn requests_parse_from_panel_json() -> Result<()> {
    let r: Request = serde_json::from_str(r#"{"command":"getSnippets"}"#)?;
    assert_eq!(r, Request::GetSnippets);

    let r: Request = serde_json::from_str(
        r#"{"command":"saveSnippet","data":{"language":"rust","originalName":"a","newName":"b","prefix":"p","description":"d","body":"x\ny"}}"#,
    )?;
    match r {
        Request::SaveSnippet(s) => {
            assert_eq!(s.original_name.as_deref(), Some("a"));
            assert_eq!(s.new_name, "b");
            assert_eq!(s.body.into_lines(), vec!["x", "y"]);
        }
        other => panic!("unexpected {:?}", other),
    }

    let r: Request =
        serde_json::from_str(r#"{"command":"deleteSnippet","data":{"language":"go","name":"n"}}"#)?;
    assert_eq!(
        r,
        Request::DeleteSnippet(DeleteRequest {
            language: "go".into(),
            name: "n".into()
        })
    );

    let r: Request =
        serde_json::from_str(r#"{"command":"insertSnippet","data":{"body":["a","b"]}}"#)?;
    assert_eq!(
        r,
        Request::InsertSnippet(InsertRequest {
            body: Body::from(vec!["a".to_string(), "b".to_string()])
        })
    );

    assert!(serde_json::from_str::<Request>(r#"{"command":"formatDisk"}"#).is_err());
    Ok(())
}

#[test]
fn activate_registers_languages_and_get_snippets_has_global() -> Result<()> {
    let root = unique_root("activate");
    seed(&root, &[("rust", r#"{"a":{"prefix":"a","body":["1"]}}"#), ("go", "{}")])?;
    let mut host = RecordingHost::default();

    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);
    assert!(ext.init_error().is_none());
    assert_eq!(host.registered, vec![vec!["go".to_string(), "rust".to_string()]]);
    assert!(ext.open_editor(&mut host));

    let view = loaded(ext.dispatch(Request::GetSnippets, &mut host));
    assert!(view["global"].is_empty());
    assert_eq!(view["rust"].len(), 1);
    // global не становится языком хранилища
    assert!(ext.store().map(|s| !s.language_ids().contains("global")).unwrap_or(false));
    Ok(())
}

#[test]
fn save_reports_success_and_returns_fresh_view() -> Result<()> {
    let root = unique_root("save");
    seed(&root, &[("rust", "{}")])?;
    let mut host = RecordingHost::default();
    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);

    let req: Request = serde_json::from_str(
        r#"{"command":"saveSnippet","data":{"language":"rust","newName":"m","prefix":"m","description":"","body":"fn m() {}"}}"#,
    )?;
    let view = loaded(ext.dispatch(req, &mut host));
    assert_eq!(view["rust"]["m"].body, vec!["fn m() {}"]);
    assert_eq!(host.infos, vec![MSG_SAVED]);

    let empty_name: Request = serde_json::from_str(
        r#"{"command":"saveSnippet","data":{"language":"rust","newName":"","body":"x"}}"#,
    )?;
    assert!(ext.dispatch(empty_name, &mut host).is_none());
    assert_eq!(host.warnings, vec!["Snippet name is required."]);
    Ok(())
}

#[test]
fn save_to_unknown_language_warns_without_writing() -> Result<()> {
    let root = unique_root("save-unknown");
    seed(&root, &[])?;
    let mut host = RecordingHost::default();
    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);

    let req: Request = serde_json::from_str(
        r#"{"command":"saveSnippet","data":{"language":"cobol","newName":"x","body":"x"}}"#,
    )?;
    ext.dispatch(req, &mut host);
    assert_eq!(host.warnings.len(), 1);
    assert!(host.warnings[0].contains("cobol"));
    assert!(host.infos.is_empty());
    assert!(!partition_path(&root, "cobol").exists());
    Ok(())
}

#[test]
fn delete_requires_modal_confirmation() -> Result<()> {
    let root = unique_root("delete");
    seed(&root, &[("rust", r#"{"a":{"prefix":"a","body":["1"]}}"#)])?;
    let mut host = RecordingHost::default();
    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);
    let req = Request::DeleteSnippet(DeleteRequest {
        language: "rust".into(),
        name: "a".into(),
    });

    // отказ: ничего не удалено, ответа нет
    host.confirms.push_back(false);
    assert!(ext.dispatch(req.clone(), &mut host).is_none());
    assert_eq!(
        host.asked,
        vec![("Are you sure you want to delete snippet \"a\"?".to_string(), true)]
    );
    assert!(ext.completions("rust").iter().any(|c| c.label == "a"));

    host.confirms.push_back(true);
    let view = loaded(ext.dispatch(req, &mut host));
    assert!(view["rust"].is_empty());
    assert_eq!(host.infos, vec![MSG_DELETED]);
    Ok(())
}

#[test]
fn insert_without_editor_reports_error() -> Result<()> {
    let root = unique_root("insert");
    seed(&root, &[])?;
    let mut host = RecordingHost::default();
    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);
    let req = Request::InsertSnippet(InsertRequest {
        body: Body::from(vec!["a".to_string(), "b".to_string()]),
    });

    assert!(ext.dispatch(req.clone(), &mut host).is_none());
    assert_eq!(host.errors, vec![MSG_NO_EDITOR]);

    host.has_editor = true;
    ext.dispatch(req, &mut host);
    assert_eq!(host.inserted, vec!["a\nb"]);
    Ok(())
}

#[test]
fn backup_and_restore_through_dialogs() -> Result<()> {
    let root = unique_root("dialogs");
    seed(&root, &[("rust", r#"{"a":{"prefix":"a","body":["1"]}}"#)])?;
    let mut host = RecordingHost::default();
    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);

    // cancelled save dialog: nothing happens
    host.paths.push_back(None);
    assert!(ext.dispatch(Request::BackupSnippets, &mut host).is_none());
    assert!(host.infos.is_empty());

    let out = root.join("backup.json");
    host.paths.push_back(Some(out.clone()));
    ext.dispatch(Request::BackupSnippets, &mut host);
    assert_eq!(host.infos, vec![MSG_BACKED_UP]);
    assert!(out.is_file());

    // restore: non-modal confirm, then open dialog
    let doc = root.join("incoming.json");
    fs::write(&doc, r#"{"go":{"p":{"prefix":"p","body":["fmt.Println($0)"]}}}"#)?;
    host.confirms.push_back(true);
    host.paths.push_back(Some(doc));
    let view = loaded(ext.dispatch(Request::RestoreSnippets, &mut host));
    assert_eq!(host.asked.last().map(|(_, modal)| *modal), Some(false));
    assert_eq!(view["go"]["p"].prefix, "p");
    assert_eq!(view["rust"].len(), 1);
    assert_eq!(host.infos.last().map(|s| s.as_str()), Some(MSG_RESTORED));
    Ok(())
}

#[test]
fn restore_of_broken_file_is_reported() -> Result<()> {
    let root = unique_root("restore-bad");
    seed(&root, &[("rust", "{}")])?;
    let mut host = RecordingHost::default();
    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);

    let doc = root.join("broken.json");
    fs::write(&doc, "{ not json")?;
    host.confirms.push_back(true);
    host.paths.push_back(Some(doc));
    assert!(ext.dispatch(Request::RestoreSnippets, &mut host).is_none());
    assert_eq!(host.errors.len(), 1);
    assert!(host.errors[0].starts_with("Error restoring snippets:"));

    // declined confirmation never opens the dialog
    host.confirms.push_back(false);
    host.paths.push_back(Some(root.join("never-read.json")));
    assert!(ext.dispatch(Request::RestoreSnippets, &mut host).is_none());
    assert_eq!(host.paths.len(), 1);
    Ok(())
}

#[test]
fn add_language_flow() -> Result<()> {
    let root = unique_root("add-lang");
    seed(&root, &[("rust", "{}")])?;
    let mut host = RecordingHost::default();
    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);

    host.inputs.push_back(Some("Ruby".into()));
    let view = loaded(ext.dispatch(Request::AddLanguage, &mut host));
    assert!(view.contains_key("ruby"));
    assert_eq!(
        host.infos,
        vec!["Language \"ruby\" added. Please reload window for auto-complete to work fully."]
    );
    assert_eq!(
        host.registered.last(),
        Some(&vec!["ruby".to_string(), "rust".to_string()])
    );

    host.inputs.push_back(Some("rust".into()));
    assert!(ext.dispatch(Request::AddLanguage, &mut host).is_none());
    assert_eq!(host.warnings, vec!["Language \"rust\" already exists."]);

    // cancelled or blank input: silent no-op
    host.inputs.push_back(None);
    host.inputs.push_back(Some("   ".into()));
    assert!(ext.dispatch(Request::AddLanguage, &mut host).is_none());
    assert!(ext.dispatch(Request::AddLanguage, &mut host).is_none());
    assert_eq!(host.warnings.len(), 1);

    host.live_registration = true;
    host.inputs.push_back(Some("lua".into()));
    ext.dispatch(Request::AddLanguage, &mut host);
    assert_eq!(host.infos.last().map(|s| s.as_str()), Some("Language \"lua\" added."));
    Ok(())
}

#[test]
fn failed_activation_disables_editor_with_cause() -> Result<()> {
    let root = unique_root("init-fail");
    fs::write(&root, b"a file, not a directory")?;
    let mut host = RecordingHost::default();

    let mut ext = Extension::activate(&root, LibraryConfig::default(), &mut host);
    assert!(ext.store().is_none());
    assert!(ext.init_error().is_some());
    assert_eq!(host.errors.len(), 1);
    assert!(host.errors[0].starts_with("Snippet Library failed to activate:"));

    assert!(!ext.open_editor(&mut host));
    assert!(host.errors[1].starts_with("Snippet Library failed to initialize:"));
    assert!(host.errors[1].ends_with("The editor is unavailable."));

    assert!(ext.dispatch(Request::GetSnippets, &mut host).is_none());
    assert!(ext.completions("rust").is_empty());
    assert!(host.registered.is_empty());
    Ok(())
}
