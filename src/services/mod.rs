//! Pricing, catalog browsing, key resolution and read-side aggregation

pub mod booking_views;
pub mod catalog_store;
pub mod config;
pub mod customer_stats;
pub mod pricing;
pub mod pro_accounts;
pub mod resolver;
pub mod selector;
pub mod slug;
pub mod snapshot;

pub use booking_views::{BookingViewAggregator, FeeSelection};
pub use catalog_store::CatalogStore;
pub use config::MarketConfig;
pub use customer_stats::CustomerStatsAggregator;
pub use pricing::PricingEngine;
pub use pro_accounts::ProAccountAggregator;
pub use resolver::{KeyResolver, OverrideTable, Resolvable};
pub use selector::CatalogSelector;
pub use slug::slugify;
pub use snapshot::{Snapshot, SnapshotLoader};
