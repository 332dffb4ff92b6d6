//! Cross-run identity store
//!
//! Tracks every identifier already seen so no item is processed twice.
//!
//! Lifecycle:
//! 1. **load** – identifiers of the master store (plus the skip ledger under
//!    [`IdentityPolicy::MarkOnDiscovery`]) become the initial set.
//! 2. **mutate** – the frontier collector inserts identifiers the moment they
//!    are discovered; the harvester marks the ones it managed to extract.
//! 3. **finalize** – the ledger is rebuilt from its old content plus this
//!    run's unextracted identifiers and replaced atomically. The master store
//!    itself is rewritten by the merger, so nothing here is flushed before
//!    the run ends.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::content_saver::{RecordStore, StoreError, atomic_write};

/// What counts as "seen" across runs.
///
/// Within a run, identifiers are always marked at discovery time so a later
/// offset cannot resurface them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// Discovered identifiers whose extraction failed are remembered in the
    /// skip ledger and never retried.
    #[default]
    MarkOnDiscovery,
    /// Only extracted identifiers (the master store) count; failed ones are
    /// rediscovered and retried on the next run.
    MarkOnExtraction,
}

/// Set of identifiers seen so far, spanning runs
#[derive(Debug)]
pub struct IdentityStore {
    policy: IdentityPolicy,
    ledger_path: Option<PathBuf>,
    known: HashSet<String>,
    ledger: Vec<String>,
    discovered: Vec<String>,
    extracted: HashSet<String>,
}

impl IdentityStore {
    /// Empty store without persistence
    #[must_use]
    pub fn new(policy: IdentityPolicy) -> Self {
        Self {
            policy,
            ledger_path: None,
            known: HashSet::new(),
            ledger: Vec::new(),
            discovered: Vec::new(),
            extracted: HashSet::new(),
        }
    }

    /// Load prior identifiers from the master store and, when the policy
    /// asks for it, from the skip ledger.
    pub fn load<S: RecordStore>(
        master: &S,
        ledger_path: impl Into<PathBuf>,
        policy: IdentityPolicy,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new(policy);
        store.ledger_path = Some(ledger_path.into());

        for record in master.load()? {
            store.known.insert(record.identifier.into());
        }
        let from_master = store.known.len();

        if policy == IdentityPolicy::MarkOnDiscovery {
            store.ledger = store.read_ledger()?;
            store.known.extend(store.ledger.iter().cloned());
        }

        tracing::info!(
            from_master,
            from_ledger = store.ledger.len(),
            ?policy,
            "Identity store loaded"
        );
        Ok(store)
    }

    fn read_ledger(&self) -> Result<Vec<String>, StoreError> {
        let Some(path) = &self.ledger_path else {
            return Ok(Vec::new());
        };
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    #[must_use]
    pub fn policy(&self) -> IdentityPolicy {
        self.policy
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.known.contains(identifier)
    }

    /// Mark an identifier as discovered. Returns `false` if already seen.
    pub fn insert(&mut self, identifier: &str) -> bool {
        if self.known.insert(identifier.to_string()) {
            self.discovered.push(identifier.to_string());
            true
        } else {
            false
        }
    }

    /// Record that an identifier produced a record this run
    pub fn mark_extracted(&mut self, identifier: &str) {
        self.extracted.insert(identifier.to_string());
    }

    /// Identifiers discovered this run, in discovery order
    #[must_use]
    pub fn discovered(&self) -> &[String] {
        &self.discovered
    }

    /// Identifiers discovered this run that never produced a record
    pub fn unextracted(&self) -> impl Iterator<Item = &str> {
        self.discovered
            .iter()
            .filter(|id| !self.extracted.contains(id.as_str()))
            .map(String::as_str)
    }

    /// Number of identifiers currently considered seen
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Persist the skip ledger (old entries followed by this run's
    /// unextracted identifiers). Returns the number of entries written.
    pub fn finalize(self) -> Result<usize, StoreError> {
        let Some(path) = self.ledger_path.as_ref() else {
            return Ok(0);
        };
        if self.policy == IdentityPolicy::MarkOnExtraction {
            return Ok(0);
        }

        let mut entries = self.ledger.clone();
        let mut in_ledger: HashSet<&str> = self.ledger.iter().map(String::as_str).collect();
        let newly_skipped: Vec<&str> = self
            .unextracted()
            .filter(|id| in_ledger.insert(id))
            .collect();

        if newly_skipped.is_empty() {
            return Ok(entries.len());
        }

        tracing::warn!(
            count = newly_skipped.len(),
            "Identifiers discovered but not extracted will not be retried on later runs"
        );
        entries.extend(newly_skipped.into_iter().map(str::to_string));

        let mut content = entries.join("\n");
        content.push('\n');
        atomic_write(path, content.as_bytes())?;
        Ok(entries.len())
    }
}
