use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use autofix_core::Run;
use autofix_logging::autofix_warn;
use tokio::sync::watch;

use crate::WriteOutcome;

/// In-memory run store, one slot per issue.
///
/// Each slot holds the latest run (or `None` before anything is known) and a
/// start epoch. Writes replace the whole run; a write issued under an older
/// epoch than the slot's current one is dropped.
#[derive(Debug, Default)]
pub struct RunCache {
    slots: Mutex<HashMap<String, Slot>>,
}

#[derive(Debug)]
struct Slot {
    tx: watch::Sender<Option<Run>>,
    epoch: u64,
}

impl Slot {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx, epoch: 0 }
    }
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw read path: the cached run regardless of any view's reset state.
    pub fn get(&self, group_id: &str) -> Option<Run> {
        self.lock()
            .get(group_id)
            .and_then(|slot| slot.tx.borrow().clone())
    }

    pub fn subscribe(&self, group_id: &str) -> watch::Receiver<Option<Run>> {
        self.with_slot(group_id, |slot| slot.tx.subscribe())
    }

    pub fn epoch(&self, group_id: &str) -> u64 {
        self.lock().get(group_id).map_or(0, |slot| slot.epoch)
    }

    /// Opens a new epoch and installs `placeholder`. Returns the new epoch.
    pub fn begin_start(&self, group_id: &str, placeholder: Run) -> u64 {
        self.with_slot(group_id, |slot| {
            slot.epoch += 1;
            slot.tx.send_replace(Some(placeholder));
            slot.epoch
        })
    }

    /// Records the failure of the start that opened `epoch`.
    ///
    /// Advances the epoch so fetches issued since that start can no longer
    /// overwrite the error run.
    pub fn fail_start(&self, group_id: &str, epoch: u64, run: Run) -> WriteOutcome {
        self.with_slot(group_id, |slot| {
            if slot.epoch != epoch {
                return WriteOutcome::Superseded;
            }
            slot.epoch += 1;
            slot.tx.send_replace(Some(run));
            WriteOutcome::Written
        })
    }

    /// Replaces the cached run if `epoch` is still current.
    pub fn store(&self, group_id: &str, epoch: u64, run: Option<Run>) -> WriteOutcome {
        self.with_slot(group_id, |slot| {
            if slot.epoch != epoch {
                return WriteOutcome::Superseded;
            }
            let mut outcome = WriteOutcome::Unchanged;
            slot.tx.send_if_modified(|current| {
                if *current == run {
                    return false;
                }
                if let (Some(previous), Some(next)) = (current.as_ref(), run.as_ref()) {
                    if !next.continues(previous) {
                        autofix_warn!(
                            "Snapshot for run {} reorders or drops stages ({} -> {})",
                            next.run_id,
                            previous.steps.len(),
                            next.steps.len()
                        );
                    }
                }
                *current = run;
                outcome = WriteOutcome::Written;
                true
            });
            outcome
        })
    }

    fn with_slot<R>(&self, group_id: &str, f: impl FnOnce(&mut Slot) -> R) -> R {
        let mut slots = self.lock();
        let slot = slots
            .entry(group_id.to_string())
            .or_insert_with(Slot::new);
        f(slot)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
