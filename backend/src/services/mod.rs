//! Service layer for business logic.
//!
//! The pure functions (`normalizer`, `range_filter`, `stats`) are shared by
//! the HTTP API and the dashboard controller. `consolidation` and `sync`
//! implement the spreadsheet ingestion used by the sync endpoint.

pub mod consolidation;
pub mod normalizer;
pub mod range_filter;
pub mod stats;
pub mod sync;

pub use consolidation::{consolidate, Consolidator};
pub use normalizer::{normalize, normalize_and_sort};
pub use range_filter::filter_by_range;
pub use stats::compute_stats;
pub use sync::{SyncOutcome, SyncService, SyncServiceError};
