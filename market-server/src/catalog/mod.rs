//! Catalog module
//!
//! Partner feed adapters, the sync engine that reconciles feed payloads
//! into the canonical catalog, and the aggregated customer-facing view.

pub mod aggregate;
pub mod feed;
pub mod reconcile;

pub use aggregate::{CatalogView, OfferingView, ProductWithOfferings};
pub use feed::{ExternalProduct, FeedAdapter, MockFeedAdapter, StoreFeedConfig, adapter_for};
pub use reconcile::{ReconcileEngine, SyncSummary};
