//! Operations dashboard view: bookings joined with services and payments

use crate::services::resolver::{KeyResolver, OverrideTable};
use crate::types::{Booking, BookingView, Outcome, Service, Transaction, Warning};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Title shown when a booking's service cannot be resolved
pub const UNKNOWN_SERVICE_TITLE: &str = "Unknown Service";

/// Which transaction supplies the platform fee when a booking has several
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeeSelection {
    /// First transaction in the order the store returned them
    #[default]
    FirstFetched,
    /// Latest `created_at`; ties keep fetch order
    MostRecent,
}

/// Builds [`BookingView`]s. Missing relations degrade to placeholders.
pub struct BookingViewAggregator<'a> {
    overrides: &'a OverrideTable,
    fee_selection: FeeSelection,
}

impl<'a> BookingViewAggregator<'a> {
    pub fn new(overrides: &'a OverrideTable) -> Self {
        Self {
            overrides,
            fee_selection: FeeSelection::default(),
        }
    }

    pub fn with_fee_selection(mut self, fee_selection: FeeSelection) -> Self {
        self.fee_selection = fee_selection;
        self
    }

    /// One view per booking, in input order
    pub fn build(
        &self,
        bookings: &[Booking],
        services: &[Service],
        transactions: &[Transaction],
    ) -> Outcome<Vec<BookingView>> {
        let resolver = KeyResolver::new(services, self.overrides);
        let payments = group_by_booking(transactions);

        let rows: Vec<(BookingView, Option<Warning>)> = bookings
            .par_iter()
            .map(|booking| self.project(booking, &resolver, &payments))
            .collect();

        let mut views = Vec::with_capacity(rows.len());
        let mut warnings = Vec::new();
        for (view, warning) in rows {
            views.push(view);
            warnings.extend(warning);
        }

        if !warnings.is_empty() {
            tracing::debug!(
                unresolved = warnings.len(),
                total = views.len(),
                "bookings with unresolved services"
            );
        }

        Outcome::new(views, warnings)
    }

    fn project(
        &self,
        booking: &Booking,
        resolver: &KeyResolver<'_, Service>,
        payments: &HashMap<&str, Vec<&Transaction>>,
    ) -> (BookingView, Option<Warning>) {
        let (service, service_match, warning) = match resolver.resolve(&booking.service_id) {
            Ok(hit) => (Some(hit.record), Some(hit.rule), None),
            Err(_) => (
                None,
                None,
                Some(Warning::UnresolvedService {
                    booking_id: booking.id.clone(),
                    service_id: booking.service_id.clone(),
                }),
            ),
        };

        let total_amount = match booking.fixed_price_total {
            Some(total) if total != 0 => total,
            _ => service.map(|s| s.fixed_base_price).unwrap_or(0),
        };

        let group = payments
            .get(booking.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let payment = self.select_payment(group);

        let view = BookingView {
            id: booking.id.clone(),
            service_id: booking.service_id.clone(),
            service_title: service
                .map(|s| s.title_en.clone())
                .unwrap_or_else(|| UNKNOWN_SERVICE_TITLE.to_string()),
            service_match,
            customer_id: booking.customer_id.clone(),
            status: booking.status,
            assignment_status: booking.assignment_status.clone(),
            created_at: booking.created_at,
            sla_window_start: booking.sla_window_start,
            sla_window_end: booking.sla_window_end,
            total_amount,
            platform_fee: payment.map(|t| t.platform_fee).unwrap_or(0),
            payment_status: payment.map(|t| t.status.clone()),
            transaction_count: group.len(),
        };

        (view, warning)
    }

    fn select_payment<'t>(&self, group: &[&'t Transaction]) -> Option<&'t Transaction> {
        match self.fee_selection {
            FeeSelection::FirstFetched => group.first().copied(),
            FeeSelection::MostRecent => group.iter().copied().reduce(|best, t| {
                if t.created_at > best.created_at {
                    t
                } else {
                    best
                }
            }),
        }
    }
}

/// Group transactions by booking id, keeping fetch order inside each group
fn group_by_booking(transactions: &[Transaction]) -> HashMap<&str, Vec<&Transaction>> {
    let mut groups: HashMap<&str, Vec<&Transaction>> = HashMap::new();
    for tx in transactions {
        groups.entry(tx.booking_id.as_str()).or_default().push(tx);
    }
    groups
}
