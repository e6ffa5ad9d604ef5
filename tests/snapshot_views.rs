//! Dashboard views built end to end from the fixture snapshot

use chrono::{TimeZone, Utc};
use marketview::services::booking_views::UNKNOWN_SERVICE_TITLE;
use marketview::services::customer_stats::UNNAMED_CUSTOMER;
use marketview::services::{
    BookingViewAggregator, CatalogSelector, CustomerStatsAggregator, FeeSelection, MarketConfig,
    PricingEngine, ProAccountAggregator, Snapshot, SnapshotLoader,
};
use marketview::types::{AddonSelection, MarketError, MatchRule, Warning};

fn load_fixture() -> Snapshot {
    let outcome = SnapshotLoader::new("tests/fixtures/snapshot").load().unwrap();
    assert!(!outcome.is_degraded(), "{:?}", outcome.warnings());
    outcome.into_value()
}

#[test]
fn test_booking_views_from_fixture() {
    let snapshot = load_fixture();
    let config = MarketConfig::default();

    let outcome = BookingViewAggregator::new(&config.overrides).build(
        &snapshot.bookings_newest_first(),
        snapshot.catalog.services(),
        &snapshot.transactions,
    );
    let views = outcome.value();

    let ids: Vec<&str> = views.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["bk-1005", "bk-1004", "bk-1002", "bk-1001", "bk-1003"]);

    // primary key
    assert_eq!(views[0].service_title, "Leak Repair");
    assert_eq!(views[0].total_amount, 11800);
    assert_eq!(views[0].platform_fee, 0);

    // unresolved
    assert_eq!(views[1].service_title, UNKNOWN_SERVICE_TITLE);
    assert_eq!(views[1].total_amount, 0);

    // slug; zero snapshot price falls back to base price
    assert_eq!(views[2].service_title, "Deep Cleaning");
    assert_eq!(views[2].service_match, Some(MatchRule::Slug));
    assert_eq!(views[2].total_amount, 14900);

    // two transactions, first fetched supplies the fee
    assert_eq!(views[3].platform_fee, 1260);
    assert_eq!(views[3].transaction_count, 2);

    // legacy key through the override table
    assert_eq!(views[4].service_title, "Basic Cleaning Service");
    assert_eq!(views[4].service_match, Some(MatchRule::Override));
    assert_eq!(views[4].platform_fee, 1035);

    assert_eq!(
        outcome.warnings(),
        &[Warning::UnresolvedService {
            booking_id: "bk-1004".into(),
            service_id: "gutter-repair".into(),
        }]
    );
}

#[test]
fn test_booking_views_most_recent_fee() {
    let snapshot = load_fixture();
    let overrides = MarketConfig::default().overrides;

    let outcome = BookingViewAggregator::new(&overrides)
        .with_fee_selection(FeeSelection::MostRecent)
        .build(
            &snapshot.bookings,
            snapshot.catalog.services(),
            &snapshot.transactions,
        );

    let bk_1001 = outcome
        .value()
        .iter()
        .find(|v| v.id == "bk-1001")
        .unwrap();
    assert_eq!(bk_1001.platform_fee, 225);
}

#[test]
fn test_customer_stats_from_fixture() {
    let snapshot = load_fixture();

    let outcome = CustomerStatsAggregator::build(&snapshot.customers(), &snapshot.bookings);
    let views = outcome.value();

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].display_name, "Ana Silva");
    assert_eq!(views[0].total_bookings, 2);
    assert_eq!(views[0].total_spent, 8400);
    assert_eq!(
        views[0].last_booking,
        Some(Utc.with_ymd_and_hms(2024, 4, 10, 14, 0, 0).unwrap())
    );

    assert_eq!(views[1].display_name, UNNAMED_CUSTOMER);
    assert_eq!(views[1].total_spent, 6900);

    // bk-1005 has no customer
    assert_eq!(outcome.warnings(), &[Warning::OrphanBookings { count: 1 }]);
}

#[test]
fn test_pro_accounts_from_fixture() {
    let snapshot = load_fixture();

    let outcome = ProAccountAggregator::build(
        &snapshot.professionals(),
        &snapshot.converted_applications(),
    );
    let views = outcome.value();

    assert_eq!(views[0].user_id, "pro-1");
    assert_eq!(views[0].services, vec!["plumbing", "handyman"]);
    assert_eq!(
        views[0].conversion_date,
        Utc.with_ymd_and_hms(2024, 1, 14, 17, 0, 0).unwrap()
    );

    // app-3 was approved but never converted, so it was filtered out
    assert_eq!(views[1].user_id, "pro-2");
    assert!(views[1].services.is_empty());
    assert_eq!(views[1].experience, None);
    assert_eq!(
        views[1].conversion_date,
        Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap()
    );
    assert_eq!(
        outcome.warnings(),
        &[Warning::MissingApplication {
            user_id: "pro-2".into()
        }]
    );
}

#[test]
fn test_pricing_and_browsing_from_fixture() {
    let snapshot = load_fixture();
    let engine = PricingEngine::new(&snapshot.catalog);

    let quote = engine
        .compute_total(
            "svc-1",
            &AddonSelection::new().with("inside-fridge", 1).with("extra-room", 2),
        )
        .unwrap();
    assert_eq!(quote.total_price_cents, 6900 + 1500 + 2 * 1800);
    assert_eq!(quote.total_duration_minutes, 120 + 20 + 2 * 25);

    assert!(matches!(
        engine.compute_checked("svc-3", &AddonSelection::new()),
        Err(MarketError::RequiredAddonMissing { .. })
    ));

    let listing = CatalogSelector::new(&snapshot.catalog).featured("cleaning");
    assert_eq!(listing.featured.map(|s| s.id.as_str()), Some("svc-2"));
    assert_eq!(listing.rest.len(), 1);
}
