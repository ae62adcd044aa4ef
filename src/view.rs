//! Presentation view of the library for the editor panel.

use crate::consts::GLOBAL_LANGUAGE;
use crate::snippet::{Partition, Snapshot};

/// Copy of `snap` that always has a `global` entry (empty if not persisted).
/// The store itself is not touched: `global` becomes a known language only once
/// its file exists.
pub fn presentation_view(snap: &Snapshot) -> Snapshot {
    let mut view = snap.clone();
    view.entry(GLOBAL_LANGUAGE.to_string())
        .or_insert_with(Partition::new);
    view
}
