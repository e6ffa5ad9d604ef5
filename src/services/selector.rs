//! Category browsing over the catalog

use crate::services::CatalogStore;
use crate::types::{CategorySummary, Featured, Service};
use std::collections::HashMap;

/// Category listings and the featured pick.
///
/// Ranking is by base price, highest first. Price stands in for popularity
/// until booking volume is available to the catalog.
pub struct CatalogSelector<'a> {
    catalog: &'a CatalogStore,
}

impl<'a> CatalogSelector<'a> {
    pub fn new(catalog: &'a CatalogStore) -> Self {
        Self { catalog }
    }

    /// Services whose `category_slug` equals `slug` exactly, price descending.
    /// Ties keep catalog order.
    pub fn list_by_category(&self, slug: &str) -> Vec<&'a Service> {
        let mut services: Vec<&Service> = self
            .catalog
            .services()
            .iter()
            .filter(|s| s.category_slug == slug)
            .collect();
        services.sort_by(|a, b| b.fixed_base_price.cmp(&a.fixed_base_price));
        services
    }

    /// Listing for a category with the top service split out
    pub fn featured(&self, slug: &str) -> Featured<'a> {
        Self::pick_featured(self.list_by_category(slug))
    }

    /// Highest-priced service becomes featured; the rest follow price descending
    pub fn pick_featured(mut services: Vec<&'a Service>) -> Featured<'a> {
        services.sort_by(|a, b| b.fixed_base_price.cmp(&a.fixed_base_price));
        if services.is_empty() {
            return Featured {
                featured: None,
                rest: services,
            };
        }
        let featured = services.remove(0);
        Featured {
            featured: Some(featured),
            rest: services,
        }
    }

    /// Distinct categories in first-seen order with count and "from" price
    pub fn categories(&self) -> Vec<CategorySummary> {
        let mut order: Vec<CategorySummary> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for service in self.catalog.services() {
            match positions.get(service.category_slug.as_str()) {
                Some(&pos) => {
                    let summary = &mut order[pos];
                    summary.service_count += 1;
                    summary.from_price = summary.from_price.min(service.fixed_base_price);
                }
                None => {
                    positions.insert(&service.category_slug, order.len());
                    order.push(CategorySummary {
                        slug: service.category_slug.clone(),
                        service_count: 1,
                        from_price: service.fixed_base_price,
                    });
                }
            }
        }

        order
    }
}
