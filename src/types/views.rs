//! Denormalized read-side projections. Built per request, never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingStatus, TransactionStatus};

/// Which resolver rule produced a match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    PrimaryKey,
    Slug,
    Override,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingView {
    pub id: String,
    pub service_id: String,
    pub service_title: String,
    /// `None` when the service could not be resolved
    pub service_match: Option<MatchRule>,
    pub customer_id: Option<String>,
    pub status: BookingStatus,
    pub assignment_status: String,
    pub created_at: DateTime<Utc>,
    pub sla_window_start: Option<DateTime<Utc>>,
    pub sla_window_end: Option<DateTime<Utc>>,
    /// Cents
    pub total_amount: i64,
    /// Cents
    pub platform_fee: i64,
    pub payment_status: Option<TransactionStatus>,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerView {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total_bookings: usize,
    /// Cents, completed bookings only
    pub total_spent: i64,
    pub last_booking: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProAccountView {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub application_id: Option<String>,
    pub services: Vec<String>,
    pub experience: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub conversion_date: DateTime<Utc>,
}
