//! Polling store for the applications list.
//!
//! The store holds the latest fetched list and two views derived from it.
//! Both views are recomputed together whenever the list is replaced, and
//! there is no other path that mutates them.
//!
//! Results are matched against a monotonic generation counter. A completion
//! is applied only when it is newer than the last one applied, so a slow
//! response still lands but can never overwrite fresher data. Nothing is
//! applied once the store has been deactivated.
use std::collections::BTreeMap;

use jobdesk_logging::desk_debug;

use crate::ApplicationRecord;

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplicationsStore {
    list: Vec<ApplicationRecord>,
    by_url: BTreeMap<String, usize>,
    running: usize,
    loading: bool,
    last_error: Option<String>,
    generation: Generation,
    applied_generation: Generation,
    active: bool,
}

impl ApplicationsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts accepting results and issues the immediate first fetch.
    pub fn activate(&mut self) -> Generation {
        self.active = true;
        self.issue()
    }

    /// Issues the fetch for a poll tick. `None` once deactivated.
    pub fn begin_fetch(&mut self) -> Option<Generation> {
        if !self.active {
            return None;
        }
        Some(self.issue())
    }

    /// Applies a completed fetch. Returns `false` when a newer result was
    /// already applied or the store is inactive, in which case nothing
    /// changed. `loading` stays set while a newer fetch is outstanding.
    pub fn complete_fetch(
        &mut self,
        generation: Generation,
        result: Result<Vec<ApplicationRecord>, String>,
    ) -> bool {
        if !self.active {
            desk_debug!("Dropping applications result gen={generation}: store inactive");
            return false;
        }
        if generation <= self.applied_generation || generation > self.generation {
            desk_debug!(
                "Dropping out-of-order applications result gen={} applied={} latest={}",
                generation,
                self.applied_generation,
                self.generation
            );
            return false;
        }

        self.applied_generation = generation;
        self.loading = generation < self.generation;
        match result {
            Ok(list) => {
                self.replace_list(list);
                self.last_error = None;
            }
            Err(message) => {
                self.last_error = Some(message);
            }
        }
        true
    }

    /// Stops accepting results; any fetch still in flight becomes a no-op.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.loading = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn list(&self) -> &[ApplicationRecord] {
        &self.list
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn running_count(&self) -> usize {
        self.running
    }

    pub fn latest_generation(&self) -> Generation {
        self.generation
    }

    /// Generation of the most recent result applied, `0` before the first.
    pub fn applied_generation(&self) -> Generation {
        self.applied_generation
    }

    /// Record currently indexed for `url`, if any.
    pub fn record_for_url(&self, url: &str) -> Option<&ApplicationRecord> {
        self.by_url.get(url).map(|&idx| &self.list[idx])
    }

    /// Indexed URLs in ascending order.
    pub fn indexed_urls(&self) -> impl Iterator<Item = &str> {
        self.by_url.keys().map(String::as_str)
    }

    pub fn index_len(&self) -> usize {
        self.by_url.len()
    }

    fn issue(&mut self) -> Generation {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    fn replace_list(&mut self, list: Vec<ApplicationRecord>) {
        self.by_url = index_by_url(&list);
        self.running = running_count(&list);
        self.list = list;
    }
}

/// Maps each non-empty URL to the position of its last record in `list`.
pub fn index_by_url(list: &[ApplicationRecord]) -> BTreeMap<String, usize> {
    let mut index = BTreeMap::new();
    for (idx, record) in list.iter().enumerate() {
        if !record.url.is_empty() {
            index.insert(record.url.clone(), idx);
        }
    }
    index
}

/// Number of records whose status is queued or in progress.
pub fn running_count(list: &[ApplicationRecord]) -> usize {
    list.iter()
        .filter(|record| record.status.is_running())
        .count()
}
