use anyhow::Result;
use std::path::PathBuf;

use sniplib::lock::writer_idle;
use sniplib::metrics::metrics_snapshot;
use sniplib::partition::partitions_dir;
use sniplib::SnippetStore;

pub fn exec(root: PathBuf, json: bool) -> Result<()> {
    let store = SnippetStore::open(&root)?;
    let snap = store.get_all_snippets();
    let total: usize = snap.values().map(|p| p.len()).sum();
    let ms = metrics_snapshot();
    let idle = writer_idle(&root)?;

    if json {
        let langs: serde_json::Map<String, serde_json::Value> = snap
            .iter()
            .map(|(l, p)| (l.clone(), serde_json::Value::from(p.len())))
            .collect();
        let out = serde_json::json!({
            "root": root.display().to_string(),
            "snippets_dir": partitions_dir(&root).display().to_string(),
            "config": {
                "data_fsync": store.cfg.data_fsync,
                "strict_paths": store.cfg.strict_paths,
                "keep_corrupt": store.cfg.keep_corrupt,
                "language_aliases": store.cfg.language_aliases,
            },
            "languages": langs,
            "snippets_total": total,
            "writer_idle": idle,
            "metrics": ms.to_json(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("root:        {}", root.display());
    println!("snippets:    {}", partitions_dir(&root).display());
    println!("config:      {}", store.cfg);
    println!("languages:   {}", snap.len());
    for (lang, p) in snap.iter() {
        println!("  {:<16} {}", lang, p.len());
    }
    println!("total:       {}", total);
    println!("lock:        {}", if idle { "free" } else { "held by a writer" });
    println!(
        "malformed partitions (this run): {}",
        ms.partitions_malformed
    );
    Ok(())
}
