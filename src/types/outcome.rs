//! Tagged aggregation results
//!
//! Hard failures travel in `Result::Err`. Joins that fell back to a
//! placeholder still produce a value, tagged `Degraded` with the reasons,
//! so callers can tell "nothing to show" from "some data was missing".

use serde::Serialize;
use std::fmt;

/// Why a result is degraded
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A booking's service reference matched nothing
    UnresolvedService {
        booking_id: String,
        service_id: String,
    },
    /// Bookings that could not be attributed to any listed customer
    OrphanBookings { count: usize },
    /// A professional with no approved, converted application
    MissingApplication { user_id: String },
    /// A snapshot collection could not be loaded and was treated as empty
    CollectionUnavailable { collection: String, reason: String },
    /// Records in one snapshot file that did not match the schema; the rest
    /// of the file was kept
    SkippedRecords {
        collection: String,
        file: String,
        skipped: usize,
        first_error: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedService {
                booking_id,
                service_id,
            } => write!(
                f,
                "booking {} references unknown service '{}'",
                booking_id, service_id
            ),
            Warning::OrphanBookings { count } => {
                write!(f, "{} booking(s) have no matching customer", count)
            }
            Warning::MissingApplication { user_id } => {
                write!(f, "professional {} has no approved application", user_id)
            }
            Warning::CollectionUnavailable { collection, reason } => {
                write!(f, "{} unavailable: {}", collection, reason)
            }
            Warning::SkippedRecords {
                collection,
                file,
                skipped,
                first_error,
            } => write!(
                f,
                "{}: skipped {} record(s) in {} ({})",
                collection, skipped, file, first_error
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded(T, Vec<Warning>),
}

impl<T> Outcome<T> {
    /// `Ok` when there are no warnings, `Degraded` otherwise
    pub fn new(value: T, warnings: Vec<Warning>) -> Self {
        if warnings.is_empty() {
            Outcome::Ok(value)
        } else {
            Outcome::Degraded(value, warnings)
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok(v) | Outcome::Degraded(v, _) => v,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Outcome::Ok(_) => &[],
            Outcome::Degraded(_, w) => w,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(..))
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn into_parts(self) -> (T, Vec<Warning>) {
        match self {
            Outcome::Ok(v) => (v, Vec::new()),
            Outcome::Degraded(v, w) => (v, w),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        let (value, warnings) = self.into_parts();
        Outcome::new(f(value), warnings)
    }

    /// Append warnings from an upstream step (e.g. snapshot loading)
    pub fn with_warnings(self, extra: impl IntoIterator<Item = Warning>) -> Self {
        let (value, mut warnings) = self.into_parts();
        warnings.extend(extra);
        Outcome::new(value, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_warnings_is_ok() {
        let out = Outcome::new(3, Vec::new());
        assert_eq!(out, Outcome::Ok(3));
        assert!(!out.is_degraded());
        assert!(out.warnings().is_empty());
    }

    #[test]
    fn test_new_with_warnings_is_degraded() {
        let w = Warning::OrphanBookings { count: 2 };
        let out = Outcome::new("views", vec![w.clone()]);
        assert!(out.is_degraded());
        assert_eq!(out.warnings(), &[w]);
        assert_eq!(*out.value(), "views");
    }

    #[test]
    fn test_map_keeps_warnings() {
        let out = Outcome::new(vec![1, 2], vec![Warning::OrphanBookings { count: 1 }]);
        let mapped = out.map(|v| v.len());
        assert_eq!(*mapped.value(), 2);
        assert!(mapped.is_degraded());
    }

    #[test]
    fn test_with_warnings_upgrades_ok() {
        let out = Outcome::Ok(()).with_warnings(vec![Warning::CollectionUnavailable {
            collection: "transactions".into(),
            reason: "missing".into(),
        }]);
        assert!(out.is_degraded());
        assert_eq!(
            out.warnings()[0].to_string(),
            "transactions unavailable: missing"
        );
    }

    #[test]
    fn test_skipped_records_display() {
        let w = Warning::SkippedRecords {
            collection: "bookings".into(),
            file: "bookings.json".into(),
            skipped: 2,
            first_error: "unknown variant".into(),
        };
        assert_eq!(
            w.to_string(),
            "bookings: skipped 2 record(s) in bookings.json (unknown variant)"
        );
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let json = serde_json::to_value(Warning::MissingApplication {
            user_id: "u1".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "missing_application");
        assert_eq!(json["user_id"], "u1");
    }
}
