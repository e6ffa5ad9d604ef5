//! Record types fetched from the external store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    InProgress,
    Completed,
    Cancelled,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    /// Usually a service id, but older rows hold a title slug or a legacy key
    pub service_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Price snapshot in cents at booking time
    #[serde(default)]
    pub fixed_price_total: Option<i64>,
    pub status: BookingStatus,
    #[serde(default)]
    pub assignment_status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sla_window_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sla_window_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub booking_id: String,
    pub amount_total: i64,
    #[serde(default)]
    pub platform_fee: i64,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    #[serde(alias = "pro")]
    Professional,
    Admin,
}

/// Platform user. Customers and professionals share this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Trimmed "first last", or `None` when both are blank
    pub fn full_name(&self) -> Option<String> {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Application submitted by a prospective professional
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProApplication {
    pub application_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub experience: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Set once the application is approved and an account exists
    #[serde(default)]
    pub converted_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProApplication {
    /// Approved and linked to a user account
    pub fn is_converted(&self) -> bool {
        self.status == ApplicationStatus::Approved && self.converted_user_id.is_some()
    }
}
