use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для библиотеки сниппетов (партиции <root>/snippets/<lang>.json)
#[derive(Parser, Debug)]
#[command(name = "sniplib", version, about = "Per-language snippet library CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Create the library layout (<root>/snippets) if missing
    Init {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
    },
    /// List languages that have a partition file
    Langs {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print snippets (all languages with `global` always present, or one language)
    List {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long)]
        lang: Option<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Create or update a snippet; --original renames an existing one
    ///
    /// Body: literal text, "@path" to read a file, "-" for stdin.
    /// Пример:
    ///   sniplib save --root ./lib --lang rust --name main --prefix fnmain --body @main.rs
    Save {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long)]
        lang: String,
        #[arg(long)]
        name: String,
        /// Previous name when renaming
        #[arg(long)]
        original: Option<String>,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Delete a snippet (asks for confirmation unless --yes)
    Delete {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long)]
        lang: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Add a language (creates an empty partition file)
    AddLang {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long)]
        lang: String,
    },
    /// Completion candidates for an editor language id
    Complete {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long)]
        lang: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export the whole library into one JSON document
    Backup {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Merge a backup document into the library (document wins on name clash)
    Restore {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long)]
        from: PathBuf,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Print config, languages, counts and metrics
    Status {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// JSON-lines panel protocol over stdin/stdout
    ///
    /// Каждая строка stdin содержит запрос {"command":"...","data":{...}}.
    /// Ответы и события хоста пишутся в stdout по одному JSON на строку.
    /// Вопросы хоста (confirm/dialog/input) читают ответ следующей строкой stdin.
    Serve {
        #[arg(long, env = "SNIPLIB_ROOT")]
        root: PathBuf,
        /// Answer every confirmation with yes
        #[arg(long, default_value_t = false)]
        assume_yes: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }
}
