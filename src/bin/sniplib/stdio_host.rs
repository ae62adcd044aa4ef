//! Host over JSON lines: events go to stdout, answers to host questions are
//! read as the next stdin line.

use anyhow::{Context, Result};
use serde_json::json;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use sniplib::{CompletionRegistry, FileFilter, Host};

use super::util::is_yes;

pub struct StdioHost<R: BufRead, W: Write> {
    input: R,
    out: W,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> StdioHost<R, W> {
    pub fn new(input: R, out: W, assume_yes: bool) -> Self {
        Self {
            input,
            out,
            assume_yes,
        }
    }

    /// Next stdin line without the trailing newline; None at EOF.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("read stdin")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn emit(&mut self, v: &serde_json::Value) -> Result<()> {
        writeln!(self.out, "{}", v)?;
        self.out.flush()?;
        Ok(())
    }

    /// Emit best-effort: a closed stdout must not abort the request.
    fn event(&mut self, v: serde_json::Value) {
        if let Err(e) = self.emit(&v) {
            log::warn!("serve: cannot write event: {:#}", e);
        }
    }

    fn ask(&mut self, v: serde_json::Value) -> Option<String> {
        self.event(v);
        match self.next_line() {
            Ok(Some(s)) => Some(s),
            Ok(None) => None,
            Err(e) => {
                log::warn!("serve: no answer: {:#}", e);
                None
            }
        }
    }

    fn ask_path(&mut self, kind: &str, filter: &FileFilter, label: &str) -> Option<PathBuf> {
        let answer = self.ask(json!({
            "event": kind,
            "label": label,
            "filter": { "label": filter.label, "extensions": filter.extensions },
        }))?;
        let answer = answer.trim();
        if answer.is_empty() {
            None
        } else {
            Some(PathBuf::from(answer))
        }
    }
}

impl<R: BufRead, W: Write> CompletionRegistry for StdioHost<R, W> {
    fn register_completion(&mut self, languages: &[String]) -> Result<bool> {
        self.emit(&json!({ "event": "registerCompletion", "languages": languages }))?;
        // Клиент подхватывает новый набор языков только после перезапуска.
        Ok(false)
    }
}

impl<R: BufRead, W: Write> Host for StdioHost<R, W> {
    fn confirm(&mut self, message: &str, modal: bool) -> bool {
        if self.assume_yes {
            return true;
        }
        self.ask(json!({ "event": "confirm", "message": message, "modal": modal }))
            .map(|a| is_yes(&a))
            .unwrap_or(false)
    }

    fn save_dialog(&mut self, filter: &FileFilter, label: &str) -> Option<PathBuf> {
        self.ask_path("saveDialog", filter, label)
    }

    fn open_dialog(&mut self, filter: &FileFilter, label: &str) -> Option<PathBuf> {
        self.ask_path("openDialog", filter, label)
    }

    fn input_box(&mut self, prompt: &str, placeholder: &str) -> Option<String> {
        self.ask(json!({ "event": "input", "prompt": prompt, "placeholder": placeholder }))
    }

    fn insert_snippet(&mut self, text: &str) -> Result<bool> {
        self.emit(&json!({ "event": "insert", "text": text }))?;
        Ok(true)
    }

    fn info(&mut self, message: &str) {
        self.event(json!({ "event": "info", "message": message }));
    }

    fn warn(&mut self, message: &str) {
        self.event(json!({ "event": "warning", "message": message }));
    }

    fn error(&mut self, message: &str) {
        self.event(json!({ "event": "error", "message": message }));
    }
}
