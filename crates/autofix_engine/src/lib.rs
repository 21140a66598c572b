//! Autofix engine: backend client, per-issue run cache and the poll loop.
mod backend;
mod cache;
mod sync;
mod types;

pub use autofix_core::is_polling;
pub use backend::{AutofixBackend, BackendSettings, ReqwestBackend};
pub use cache::RunCache;
pub use sync::{AutofixSession, SyncEngine};
pub use types::{
    BackendError, Clock, StartRunRequest, SyncSettings, WriteOutcome, GENERIC_START_ERROR,
    POLL_INTERVAL,
};
