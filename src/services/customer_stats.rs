//! Customer lifetime statistics derived from bookings

use crate::types::{Booking, BookingStatus, CustomerView, Outcome, User, Warning};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Shown when a customer has neither first nor last name
pub const UNNAMED_CUSTOMER: &str = "Unnamed Customer";

/// Builds [`CustomerView`]s. Statistics are recomputed on every call.
pub struct CustomerStatsAggregator;

impl CustomerStatsAggregator {
    /// One view per customer, in input order
    pub fn build(customers: &[User], bookings: &[Booking]) -> Outcome<Vec<CustomerView>> {
        let groups = group_by_customer(bookings);

        let views: Vec<CustomerView> = customers
            .par_iter()
            .map(|customer| {
                let group = groups
                    .get(customer.id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                Self::project(customer, group)
            })
            .collect();

        let known: HashSet<&str> = customers.iter().map(|c| c.id.as_str()).collect();
        let orphans = bookings
            .iter()
            .filter(|b| {
                b.customer_id
                    .as_deref()
                    .is_none_or(|id| !known.contains(id))
            })
            .count();

        let mut warnings = Vec::new();
        if orphans > 0 {
            tracing::debug!(orphans, "bookings without a listed customer");
            warnings.push(Warning::OrphanBookings { count: orphans });
        }

        Outcome::new(views, warnings)
    }

    fn project(customer: &User, group: &[&Booking]) -> CustomerView {
        let total_spent = group
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .fold(0i64, |acc, b| {
                acc.saturating_add(b.fixed_price_total.unwrap_or(0))
            });

        CustomerView {
            id: customer.id.clone(),
            display_name: customer
                .full_name()
                .unwrap_or_else(|| UNNAMED_CUSTOMER.to_string()),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            created_at: customer.created_at,
            total_bookings: group.len(),
            total_spent,
            last_booking: group.iter().map(|b| b.created_at).max(),
        }
    }
}

/// Single pass: customer id to that customer's bookings in input order
fn group_by_customer(bookings: &[Booking]) -> HashMap<&str, Vec<&Booking>> {
    let mut groups: HashMap<&str, Vec<&Booking>> = HashMap::new();
    for booking in bookings {
        if let Some(customer_id) = booking.customer_id.as_deref() {
            groups.entry(customer_id).or_default().push(booking);
        }
    }
    groups
}
