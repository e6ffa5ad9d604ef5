//! Catalog types: services, addons and price quotes

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A purchasable service in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub category_slug: String,
    pub title_en: String,
    #[serde(default)]
    pub title_de: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_de: String,
    /// Base price in cents
    pub fixed_base_price: i64,
    pub fixed_duration_minutes: u32,
    #[serde(default)]
    pub addons: Vec<Addon>,
}

impl Service {
    /// Find an addon of this service by id
    pub fn addon(&self, addon_id: &str) -> Option<&Addon> {
        self.addons.iter().find(|a| a.id == addon_id)
    }
}

/// Optional priced modifier to a service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Addon {
    /// Unique within the parent service only
    pub id: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_de: String,
    /// Price delta in cents per unit
    pub price_delta: i64,
    #[serde(default)]
    pub duration_delta_minutes: i64,
    #[serde(default)]
    pub max_qty: Option<u32>,
    #[serde(default)]
    pub is_required: bool,
}

/// Requested addon quantities keyed by addon id. Absent key means zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AddonSelection(HashMap<String, u32>);

impl AddonSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, addon_id: impl Into<String>, qty: u32) -> Self {
        self.0.insert(addon_id.into(), qty);
        self
    }

    pub fn set(&mut self, addon_id: impl Into<String>, qty: u32) {
        self.0.insert(addon_id.into(), qty);
    }

    pub fn quantity(&self, addon_id: &str) -> u32 {
        self.0.get(addon_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&q| q == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for AddonSelection {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, q)| (k.into(), q)).collect())
    }
}

/// Computed total for a service purchase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceQuote {
    pub total_price_cents: i64,
    pub total_duration_minutes: i64,
}

/// Category listing split into the promoted service and the remainder
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Featured<'a> {
    pub featured: Option<&'a Service>,
    pub rest: Vec<&'a Service>,
}

/// Per-category overview for browsing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategorySummary {
    pub slug: String,
    pub service_count: usize,
    /// Lowest base price in the category, in cents
    pub from_price: i64,
}
