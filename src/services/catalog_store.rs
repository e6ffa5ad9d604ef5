//! Read-only catalog of services and their addons

use crate::types::{MarketError, Result, Service};
use std::collections::{HashMap, HashSet};

/// Catalog shipped with the binary, used when no exported catalog exists
const SEED_CATALOG: &str = include_str!("../../data/seed_catalog.json");

/// Immutable catalog snapshot. Validated once at construction.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    services: Vec<Service>,
    index: HashMap<String, usize>,
}

impl CatalogStore {
    /// Build a store, rejecting duplicate ids and negative base prices
    pub fn new(services: Vec<Service>) -> Result<Self> {
        let mut index = HashMap::with_capacity(services.len());

        for (pos, service) in services.iter().enumerate() {
            if service.fixed_base_price < 0 {
                return Err(MarketError::InvalidCatalog(format!(
                    "service '{}' has negative base price {}",
                    service.id, service.fixed_base_price
                )));
            }

            let mut addon_ids = HashSet::new();
            for addon in &service.addons {
                if !addon_ids.insert(addon.id.as_str()) {
                    return Err(MarketError::InvalidCatalog(format!(
                        "service '{}' lists addon '{}' twice",
                        service.id, addon.id
                    )));
                }
            }

            if index.insert(service.id.clone(), pos).is_some() {
                return Err(MarketError::InvalidCatalog(format!(
                    "duplicate service id '{}'",
                    service.id
                )));
            }
        }

        Ok(Self { services, index })
    }

    /// Load the built-in seed catalog
    pub fn seed() -> Result<Self> {
        let services: Vec<Service> = serde_json::from_str(SEED_CATALOG)
            .map_err(|e| MarketError::Parse(format!("seed catalog: {}", e)))?;
        Self::new(services)
    }

    /// Exact id lookup
    pub fn get(&self, id: &str) -> Option<&Service> {
        self.index.get(id).map(|&pos| &self.services[pos])
    }

    /// All services in catalog order
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::{Addon, Service};

    pub fn make_service(id: &str, category: &str, title: &str, price: i64) -> Service {
        Service {
            id: id.into(),
            category_slug: category.into(),
            title_en: title.into(),
            title_de: String::new(),
            description_en: String::new(),
            description_de: String::new(),
            fixed_base_price: price,
            fixed_duration_minutes: 60,
            addons: Vec::new(),
        }
    }

    pub fn make_addon(id: &str, price: i64, minutes: i64, max_qty: Option<u32>) -> Addon {
        Addon {
            id: id.into(),
            title_en: String::new(),
            title_de: String::new(),
            price_delta: price,
            duration_delta_minutes: minutes,
            max_qty,
            is_required: false,
        }
    }
}
