use anyhow::Result;
use log::{info, warn};
use serde_json::json;
use std::path::PathBuf;

use sniplib::{Extension, LibraryConfig, Request};

use super::stdio_host::StdioHost;

/// CLI: serve, протокол панели редактора поверх stdin/stdout (JSON lines).
///
/// Пример сессии:
///   > {"command":"getSnippets"}
///   < {"command":"loadSnippets","data":{"global":{}}}
///   > {"command":"deleteSnippet","data":{"language":"rust","name":"main"}}
///   < {"event":"confirm","message":"Are you sure ...","modal":true}
///   > yes
pub fn exec(root: PathBuf, assume_yes: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut host = StdioHost::new(stdin.lock(), stdout.lock(), assume_yes);

    let mut ext = Extension::activate(&root, LibraryConfig::from_env(), &mut host);
    if !ext.open_editor(&mut host) {
        // Ошибка уже показана хостом; процесс завершается с кодом 1.
        anyhow::bail!("library at {} is unavailable", root.display());
    }
    info!("serve: ready (root={})", root.display());

    while let Some(line) = host.next_line()? {
        if line.trim().is_empty() {
            continue;
        }
        let req: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!("serve: bad request: {}", e);
                host.emit(&json!({ "event": "error", "message": format!("bad request: {e}") }))?;
                continue;
            }
        };
        if let Some(resp) = ext.dispatch(req, &mut host) {
            host.emit(&serde_json::to_value(&resp)?)?;
        }
    }
    info!("serve: stdin closed, exiting");
    Ok(())
}
