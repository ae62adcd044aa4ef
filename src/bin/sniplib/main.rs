use anyhow::Result;
use env_logger::{Builder, Env};

mod cli;
mod util;
mod stdio_host;
mod cmd_init;
mod cmd_langs;
mod cmd_list;
mod cmd_save;
mod cmd_delete;
mod cmd_add_lang;
mod cmd_complete;
mod cmd_backup;
mod cmd_restore;
mod cmd_status;
mod cmd_serve;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе info. Логи идут в stderr,
    // stdout остаётся чистым для --json и serve.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Init { root } => cmd_init::exec(root),

        cli::Cmd::Langs { root, json } => cmd_langs::exec(root, json),

        cli::Cmd::List { root, lang, json } => cmd_list::exec(root, lang, json),

        cli::Cmd::Save {
            root,
            lang,
            name,
            original,
            prefix,
            description,
            body,
        } => cmd_save::exec(root, lang, name, original, prefix, description, body),

        cli::Cmd::Delete { root, lang, name, yes } => cmd_delete::exec(root, lang, name, yes),

        cli::Cmd::AddLang { root, lang } => cmd_add_lang::exec(root, lang),

        cli::Cmd::Complete { root, lang, json } => cmd_complete::exec(root, lang, json),

        cli::Cmd::Backup { root, out } => cmd_backup::exec(root, out),

        cli::Cmd::Restore { root, from, yes } => cmd_restore::exec(root, from, yes),

        cli::Cmd::Status { root, json } => cmd_status::exec(root, json),

        cli::Cmd::Serve { root, assume_yes } => cmd_serve::exec(root, assume_yes),
    }
}
