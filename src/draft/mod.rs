//! Draft Module
//!
//! Autosave of in-progress intake forms: the client-side debounced
//! persister, the save seam it calls through, and the server-side store.

mod http;
mod persister;
mod saver;
mod store;

pub use http::HttpDraftSaver;
pub use persister::{
    ChangeOutcome, DebouncedPersister, DraftContext, PersistState, PersisterConfig,
    PersisterStatus, SkipReason,
};
pub use saver::{DraftPayload, DraftSaver, SaveReceipt};
pub use store::{DraftRecord, DraftStore, StoredDraft};

// == Public Constants ==
/// Default quiet period before a changed draft is saved
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 2000;
