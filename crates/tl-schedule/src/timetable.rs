//! `Timetable`: one-shot, time-triggered spawn manifest.
//!
//! Each poll scans the manifest in order.  Manifests are a handful of
//! entries, so a linear scan beats maintaining a sorted index; the fired set
//! is what guarantees exactly-once delivery.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::{ScheduleError, ScheduleResult, SpawnEntry};

/// The spawn manifest plus the set of entry ids that have already fired.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    entries: Vec<SpawnEntry>,
    fired:   FxHashSet<String>,
}

impl Timetable {
    /// An empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a manifest, rejecting repeated ids (a repeated id could
    /// never fire, since firing is tracked by id).
    pub fn from_entries(entries: Vec<SpawnEntry>) -> ScheduleResult<Self> {
        let mut table = Self::new();
        for entry in entries {
            table.push(entry)?;
        }
        Ok(table)
    }

    /// Append one entry to the manifest.
    pub fn push(&mut self, entry: SpawnEntry) -> ScheduleResult<()> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(ScheduleError::DuplicateEntry(entry.id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Every not-yet-fired entry whose trigger time is ≤ `now_secs`, in
    /// manifest order.  Returned entries are marked fired and will never be
    /// returned again.
    pub fn check_spawns(&mut self, now_secs: f64) -> Vec<SpawnEntry> {
        let mut due = Vec::new();
        for entry in &self.entries {
            if entry.is_due(now_secs) && !self.fired.contains(&entry.id) {
                self.fired.insert(entry.id.clone());
                debug!(entry = %entry.id, trigger = entry.trigger_secs, now = now_secs, "spawn due");
                due.push(entry.clone());
            }
        }
        due
    }

    pub fn has_fired(&self, id: &str) -> bool {
        self.fired.contains(id)
    }

    /// Number of entries still waiting to fire.
    pub fn pending(&self) -> usize {
        self.entries.len() - self.fired.len()
    }

    /// `true` once every entry has fired.
    pub fn is_exhausted(&self) -> bool {
        self.pending() == 0
    }

    /// Earliest trigger time among entries that have not fired yet.
    pub fn next_trigger(&self) -> Option<f64> {
        self.entries
            .iter()
            .filter(|e| !self.fired.contains(&e.id))
            .map(|e| e.trigger_secs)
            .min_by(f64::total_cmp)
    }

    pub fn entries(&self) -> &[SpawnEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
