//! Keeps a local view of a remote run in step with the backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use autofix_core::{is_polling, RootCauseSelection, Run};
use autofix_logging::{autofix_debug, autofix_info, autofix_trace, autofix_warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::backend::AutofixBackend;
use crate::cache::RunCache;
use crate::{
    BackendError, Clock, StartRunRequest, SyncSettings, WriteOutcome, GENERIC_START_ERROR,
};

type PollerRegistry = Arc<Mutex<HashMap<String, Weak<Poller>>>>;

/// Shared entry point: one backend, one cache partitioned by issue, and at
/// most one poll task per issue.
#[derive(Clone)]
pub struct SyncEngine {
    backend: Arc<dyn AutofixBackend>,
    cache: Arc<RunCache>,
    pollers: PollerRegistry,
    settings: SyncSettings,
    clock: Clock,
}

impl SyncEngine {
    pub fn new(backend: Arc<dyn AutofixBackend>, settings: SyncSettings) -> Self {
        Self {
            backend,
            cache: Arc::new(RunCache::new()),
            pollers: Arc::default(),
            settings,
            clock: Arc::new(|| chrono::Utc::now().to_rfc3339()),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Raw read path; ignores any session's reset.
    pub fn cached_run(&self, group_id: &str) -> Option<Run> {
        self.cache.get(group_id)
    }

    /// Opens a view on one issue, joining its poll task or starting one.
    ///
    /// Must be called from within a tokio runtime. Polling stops when the
    /// last session on the issue is dropped.
    pub fn open(&self, group_id: impl Into<String>, event_id: impl Into<String>) -> AutofixSession {
        let group_id = group_id.into();
        let poller = self.poller_for(&group_id);
        AutofixSession {
            group_id,
            event_id: event_id.into(),
            engine: self.clone(),
            is_reset: AtomicBool::new(false),
            _poller: poller,
        }
    }

    fn poller_for(&self, group_id: &str) -> Arc<Poller> {
        let mut pollers = lock_registry(&self.pollers);
        if let Some(poller) = pollers.get(group_id).and_then(Weak::upgrade) {
            autofix_debug!("Joining poll task group_id={}", group_id);
            return poller;
        }
        let poller = Arc::new(Poller::spawn(self.clone(), group_id.to_string()));
        pollers.insert(group_id.to_string(), Arc::downgrade(&poller));
        poller
    }

    fn now(&self) -> String {
        (self.clock)()
    }
}

fn lock_registry(pollers: &PollerRegistry) -> MutexGuard<'_, HashMap<String, Weak<Poller>>> {
    pollers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One operator's view on one issue's run.
pub struct AutofixSession {
    group_id: String,
    event_id: String,
    engine: SyncEngine,
    is_reset: AtomicBool,
    _poller: Arc<Poller>,
}

impl AutofixSession {
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Starts a run with `instruction`. Never fails: a rejected start ends up
    /// in the cache as an `ERROR` run.
    pub async fn start(&self, instruction: &str) {
        self.is_reset.store(false, Ordering::SeqCst);
        // Written before the first await so the view shows it immediately.
        let epoch = self
            .engine
            .cache
            .begin_start(&self.group_id, Run::placeholder(self.engine.now()));

        autofix_info!(
            "Starting autofix group_id={} event_id={} instruction_len={}",
            self.group_id,
            self.event_id,
            instruction.len()
        );
        let request = StartRunRequest {
            event_id: self.event_id.clone(),
            instruction: instruction.to_string(),
        };
        let err = match self.engine.backend.start_run(&self.group_id, &request).await {
            Ok(()) => {
                autofix_debug!("Autofix start accepted group_id={}", self.group_id);
                return;
            }
            Err(err) => err,
        };

        autofix_warn!("Autofix start failed group_id={}: {}", self.group_id, err);
        let message = err.detail().unwrap_or(GENERIC_START_ERROR);
        let outcome = self.engine.cache.fail_start(
            &self.group_id,
            epoch,
            Run::errored(message, self.engine.now()),
        );
        if outcome == WriteOutcome::Superseded {
            autofix_debug!(
                "Dropped start failure for group_id={}, a newer start is running",
                self.group_id
            );
        }
    }

    /// Hides the run from this session without touching the cache or the backend.
    pub fn reset(&self) {
        autofix_debug!("Reset view group_id={}", self.group_id);
        self.is_reset.store(true, Ordering::SeqCst);
    }

    pub fn is_reset(&self) -> bool {
        self.is_reset.load(Ordering::SeqCst)
    }

    /// Reset-aware read path.
    pub fn current(&self) -> Option<Run> {
        if self.is_reset() {
            None
        } else {
            self.engine.cache.get(&self.group_id)
        }
    }

    pub fn is_polling(&self) -> bool {
        is_polling(self.current().as_ref())
    }

    /// Notifies on every cache write for this issue.
    pub fn subscribe(&self) -> watch::Receiver<Option<Run>> {
        self.engine.cache.subscribe(&self.group_id)
    }

    pub async fn select_root_cause(
        &self,
        run_id: &str,
        selection: &RootCauseSelection,
    ) -> Result<(), BackendError> {
        autofix_info!(
            "Selecting root cause group_id={} run_id={} selection={:?}",
            self.group_id,
            run_id,
            selection
        );
        let result = self
            .engine
            .backend
            .select_root_cause(&self.group_id, run_id, selection)
            .await;
        if let Err(err) = &result {
            autofix_warn!(
                "Root cause selection failed group_id={}: {}",
                self.group_id,
                err
            );
        }
        result
    }
}

/// Background fetch loop for one issue, shared by all its sessions;
/// cancelled when the last one drops.
struct Poller {
    group_id: String,
    registry: PollerRegistry,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl Poller {
    fn spawn(engine: SyncEngine, group_id: String) -> Self {
        let cancel = CancellationToken::new();
        let registry = engine.pollers.clone();
        let task = tokio::spawn(poll_loop(engine, group_id.clone(), cancel.clone()));
        Self {
            group_id,
            registry,
            cancel,
            _task: task,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        // An in-flight fetch finishes on its own and its result is discarded.
        self.cancel.cancel();
        let mut pollers = lock_registry(&self.registry);
        // A newer poller may already own the entry.
        if pollers
            .get(&self.group_id)
            .is_some_and(|entry| entry.strong_count() == 0)
        {
            pollers.remove(&self.group_id);
        }
        autofix_debug!("Stopped polling group_id={}", self.group_id);
    }
}

async fn poll_loop(engine: SyncEngine, group_id: String, cancel: CancellationToken) {
    let mut rx = engine.cache.subscribe(&group_id);
    let mut ticker = tokio::time::interval(engine.settings.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let mut paused = false;
        loop {
            let pollable = is_polling(rx.borrow_and_update().as_ref());
            if pollable {
                break;
            }
            if !paused {
                autofix_debug!("Polling paused, run is terminal group_id={}", group_id);
                paused = true;
            }
            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
        if paused {
            autofix_debug!("Polling resumed group_id={}", group_id);
            ticker.reset();
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }
        // A local write may have finished the run while we waited.
        if !is_polling(engine.cache.get(&group_id).as_ref()) {
            continue;
        }

        let epoch = engine.cache.epoch(&group_id);
        let result = engine.backend.fetch_run(&group_id).await;
        if cancel.is_cancelled() {
            autofix_trace!("Discarding fetch for closed view group_id={}", group_id);
            return;
        }
        match result {
            Ok(run) => {
                let outcome = engine.cache.store(&group_id, epoch, run);
                autofix_trace!("Fetched run group_id={} outcome={:?}", group_id, outcome);
            }
            Err(err) => {
                autofix_warn!("Fetching run failed group_id={}: {}", group_id, err);
            }
        }
    }
}
