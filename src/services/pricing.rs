//! Pricing engine for service purchases
//!
//! Totals are integer cents and whole minutes. The base computation only
//! sums; quantity caps and required addons are checked by
//! [`PricingEngine::validate_selection`], which booking flows run before
//! accepting a quote.

use crate::services::CatalogStore;
use crate::types::{AddonSelection, MarketError, PriceQuote, Result, Service};

/// Computes quotes against a catalog snapshot
pub struct PricingEngine<'a> {
    catalog: &'a CatalogStore,
}

impl<'a> PricingEngine<'a> {
    pub fn new(catalog: &'a CatalogStore) -> Self {
        Self { catalog }
    }

    /// Base price plus addon deltas, base duration plus addon deltas.
    ///
    /// Addon ids in the selection that the service does not offer are ignored.
    /// A total outside the i64 range is an error, never a capped value.
    pub fn compute_total(&self, service_id: &str, selection: &AddonSelection) -> Result<PriceQuote> {
        let service = self.service(service_id)?;
        Self::quote(service, selection)
    }

    /// Validate the selection, then compute the quote
    pub fn compute_checked(
        &self,
        service_id: &str,
        selection: &AddonSelection,
    ) -> Result<PriceQuote> {
        let service = self.service(service_id)?;
        Self::check(service, selection)?;
        Self::quote(service, selection)
    }

    /// Reject quantities above `max_qty` and missing required addons
    pub fn validate_selection(&self, service_id: &str, selection: &AddonSelection) -> Result<()> {
        let service = self.service(service_id)?;
        Self::check(service, selection)
    }

    fn service(&self, service_id: &str) -> Result<&'a Service> {
        self.catalog
            .get(service_id)
            .ok_or_else(|| MarketError::ServiceNotFound(service_id.to_string()))
    }

    /// Sums in i128 so the result is exactly base + sum of deltas regardless
    /// of addon order; only the final total must fit in i64.
    fn quote(service: &Service, selection: &AddonSelection) -> Result<PriceQuote> {
        let mut total_price = i128::from(service.fixed_base_price);
        let mut total_duration = i128::from(service.fixed_duration_minutes);

        for addon in &service.addons {
            let qty = i128::from(selection.quantity(&addon.id));
            if qty == 0 {
                continue;
            }
            total_price += i128::from(addon.price_delta) * qty;
            total_duration += i128::from(addon.duration_delta_minutes) * qty;
        }

        let overflow = |_| MarketError::QuoteOverflow {
            service_id: service.id.clone(),
        };
        Ok(PriceQuote {
            total_price_cents: i64::try_from(total_price).map_err(overflow)?,
            total_duration_minutes: i64::try_from(total_duration).map_err(overflow)?,
        })
    }

    fn check(service: &Service, selection: &AddonSelection) -> Result<()> {
        for addon in &service.addons {
            let qty = selection.quantity(&addon.id);
            if addon.is_required && qty == 0 {
                return Err(MarketError::RequiredAddonMissing {
                    addon_id: addon.id.clone(),
                });
            }
            if let Some(max) = addon.max_qty {
                if qty > max {
                    return Err(MarketError::AddonLimitExceeded {
                        addon_id: addon.id.clone(),
                        requested: qty,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}
