use anyhow::{Context, Result};
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

/// "-" -> stdin, "@path" -> file contents, otherwise the literal text.
pub fn decode_text_arg(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read body from stdin")?;
        return Ok(buf);
    }
    if let Some(p) = arg.strip_prefix('@') {
        let path = PathBuf::from(p);
        return std::fs::read_to_string(&path)
            .with_context(|| format!("read body file {}", path.display()));
    }
    Ok(arg.to_string())
}

/// y/yes on stdin -> true. Prompt goes to stderr.
pub fn confirm_tty(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(is_yes(&line))
}

pub fn is_yes(answer: &str) -> bool {
    let s = answer.trim().to_ascii_lowercase();
    s == "y" || s == "yes" || s == "true" || s == "1"
}

/// First line of a body for one-line listings.
pub fn first_line(lines: &[String]) -> String {
    match lines.first() {
        Some(l) if lines.len() > 1 => format!("{l} (+{} line(s))", lines.len() - 1),
        Some(l) => l.clone(),
        None => "(empty)".to_string(),
    }
}
