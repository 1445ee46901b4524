//! Resume Site Cache - content cache and draft autosave for the site backend
//!
//! Provides a TTL cache with pattern invalidation for database reads and a
//! debounced persister for in-progress intake forms.

pub mod api;
pub mod cache;
pub mod config;
pub mod draft;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{KeyPattern, TtlCache};
pub use config::Config;
pub use draft::{DebouncedPersister, DraftContext, DraftSaver, DraftStore, HttpDraftSaver};
pub use tasks::{spawn_sweep_task, SweepTask};
