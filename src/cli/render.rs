//! Text and JSON rendering for CLI reports

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketview::types::{
    BookingView, CategorySummary, CustomerView, Featured, Outcome, ProAccountView, Warning,
};

/// JSON envelope: the data plus whether it is degraded and why
#[derive(Serialize)]
struct Envelope<'a, T> {
    degraded: bool,
    warnings: &'a [Warning],
    data: &'a T,
}

pub fn print_json<T: Serialize>(outcome: &Outcome<T>) -> anyhow::Result<()> {
    let envelope = Envelope {
        degraded: outcome.is_degraded(),
        warnings: outcome.warnings(),
        data: outcome.value(),
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Log each warning; the report itself still prints
pub fn log_warnings(warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
}

/// Cents to a fixed two-decimal amount, e.g. 8400 -> "84.00"
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

fn format_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_featured(slug: &str, listing: &Featured<'_>) {
    let Some(featured) = listing.featured else {
        println!("Category '{}' not found", slug);
        return;
    };
    println!("{}", slug);
    println!(
        "  * {:<28} {:>10}  {:>4} min  [{}]",
        featured.title_en,
        format_cents(featured.fixed_base_price),
        featured.fixed_duration_minutes,
        featured.id
    );
    for service in &listing.rest {
        println!(
            "    {:<28} {:>10}  {:>4} min  [{}]",
            service.title_en,
            format_cents(service.fixed_base_price),
            service.fixed_duration_minutes,
            service.id
        );
    }
}

pub fn print_categories(categories: &[CategorySummary]) {
    println!("{:<20} {:>8} {:>10}", "Category", "Services", "From");
    for c in categories {
        println!(
            "{:<20} {:>8} {:>10}",
            c.slug,
            c.service_count,
            format_cents(c.from_price)
        );
    }
}

pub fn print_bookings(views: &[BookingView]) {
    println!(
        "{:<10} {:<26} {:<12} {:>10} {:>8} {:>4}  {}",
        "Booking", "Service", "Status", "Total", "Fee", "Txs", "Created"
    );
    for v in views {
        println!(
            "{:<10} {:<26} {:<12} {:>10} {:>8} {:>4}  {}",
            v.id,
            v.service_title,
            format!("{:?}", v.status),
            format_cents(v.total_amount),
            format_cents(v.platform_fee),
            v.transaction_count,
            format_date(Some(v.created_at))
        );
    }
}

pub fn print_customers(views: &[CustomerView]) {
    println!(
        "{:<10} {:<24} {:>8} {:>12}  {}",
        "Customer", "Name", "Bookings", "Spent", "Last booking"
    );
    for v in views {
        println!(
            "{:<10} {:<24} {:>8} {:>12}  {}",
            v.id,
            v.display_name,
            v.total_bookings,
            format_cents(v.total_spent),
            format_date(v.last_booking)
        );
    }
}

pub fn print_pro_accounts(views: &[ProAccountView]) {
    println!(
        "{:<10} {:<24} {:<10} {:<12}  {}",
        "User", "Name", "App", "Converted", "Services"
    );
    for v in views {
        println!(
            "{:<10} {:<24} {:<10} {:<12}  {}",
            v.user_id,
            v.display_name,
            v.application_id.as_deref().unwrap_or("-"),
            format_date(Some(v.conversion_date)),
            v.services.join(", ")
        );
    }
}
