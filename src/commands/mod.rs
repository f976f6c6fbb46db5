//! CLI command implementations.

pub mod appstore;
pub mod play;

pub use appstore::{AppStoreCommand, LocalizationOutcome, LocalizationSyncReport};
pub use play::{LookupOutcome, PlayCommand, SyncOutcome, SyncSummary};
