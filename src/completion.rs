//! completion: completion candidates for an editor language.
//!
//! Порядок: сначала все сниппеты целевого языка (в порядке партиции), затем все
//! global-сниппеты с меткой "<name> (Global)". Дедупликации нет: одинаковые имена
//! в двух партициях дают два кандидата.
//!
//! Candidates: ленивый итератор поверх Arc<Snapshot>, взятого в момент вызова;
//! кэша между вызовами нет.

use std::sync::Arc;

use crate::consts::{GLOBAL_LABEL_SUFFIX, GLOBAL_LANGUAGE};
use crate::metrics::record_candidate_build;
use crate::snippet::{Partition, Snapshot};
use crate::store::SnippetStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Language,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub prefix: String,
    pub body: Vec<String>,
    pub label: String,
    pub documentation: String,
    pub scope: Scope,
}

impl Candidate {
    /// Text handed to the host's snippet insertion (tabstops untouched).
    pub fn insert_text(&self) -> String {
        self.body.join("\n")
    }
}

pub struct Candidates {
    snapshot: Arc<Snapshot>,
    target: String,
    scope: Scope,
    idx: usize,
}

impl Candidates {
    fn current_partition(&self) -> Option<&Partition> {
        match self.scope {
            Scope::Language => self.snapshot.get(&self.target),
            Scope::Global => self.snapshot.get(GLOBAL_LANGUAGE),
        }
    }
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let entry = self
                .current_partition()
                .and_then(|p| p.get_index(self.idx))
                .map(|(name, s)| (name.clone(), s.clone()));

            match entry {
                Some((name, s)) => {
                    self.idx += 1;
                    let label = match self.scope {
                        Scope::Language => name,
                        Scope::Global => format!("{name}{GLOBAL_LABEL_SUFFIX}"),
                    };
                    return Some(Candidate {
                        prefix: s.prefix,
                        body: s.body,
                        label,
                        documentation: s.description,
                        scope: self.scope,
                    });
                }
                None if self.scope == Scope::Language => {
                    self.scope = Scope::Global;
                    self.idx = 0;
                }
                None => return None,
            }
        }
    }
}

/// Candidates for an editor language id (aliases resolved via config).
pub fn build_candidates(store: &SnippetStore, language: &str) -> Candidates {
    record_candidate_build();
    Candidates {
        snapshot: store.get_all_snippets(),
        target: store.cfg.resolve_alias(language).to_string(),
        scope: Scope::Language,
        idx: 0,
    }
}
