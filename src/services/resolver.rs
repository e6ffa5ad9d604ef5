//! Key resolution for joins that are not referentially enforced
//!
//! Booking rows reference services by id, by a slug of the title, or by a
//! handful of legacy keys that match neither. Resolution tries, in order:
//! exact primary key, slugified title, then the override table.

use crate::services::slug::slugify;
use crate::types::{MarketError, MatchRule, ProApplication, Result, Service};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A record that can be the target of a key lookup
pub trait Resolvable {
    /// Key compared against the raw id for an exact match
    fn primary_key(&self) -> Option<&str>;

    /// Title used for slug and override matching. `None` limits the record
    /// to exact matches.
    fn title(&self) -> Option<&str> {
        None
    }
}

impl Resolvable for Service {
    fn primary_key(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title_en)
    }
}

/// Applications are looked up by the user account they converted into
impl Resolvable for ProApplication {
    fn primary_key(&self) -> Option<&str> {
        self.converted_user_id.as_deref()
    }
}

/// Versioned table of raw keys that match no id or slug.
///
/// Each entry maps a raw key to a target, which is matched against record
/// primary keys first and then, case-insensitively, against titles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverrideTable {
    pub version: u32,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl OverrideTable {
    pub fn empty() -> Self {
        Self {
            version: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Legacy booking keys written before services had stable ids
    pub fn builtin() -> Self {
        let entries = [
            ("basic-cleaning", "Basic Cleaning Service"),
            ("deep-clean", "Deep Cleaning"),
            ("moveout-cleaning", "Move-Out Cleaning"),
            ("tv-mount", "TV Wall Mounting"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            version: 1,
            entries,
        }
    }
}

impl Default for OverrideTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A successful resolution
#[derive(Debug)]
pub struct Resolution<'a, T> {
    pub record: &'a T,
    pub rule: MatchRule,
}

/// Index over a target collection. Built once, then each lookup is O(1).
/// Where several records share a key the first in input order wins.
pub struct KeyResolver<'a, T> {
    records: &'a [T],
    by_key: HashMap<&'a str, usize>,
    by_slug: HashMap<String, usize>,
    by_override: HashMap<String, usize>,
}

impl<'a, T: Resolvable> KeyResolver<'a, T> {
    /// Full precedence: primary key, slug, override
    pub fn new(records: &'a [T], overrides: &OverrideTable) -> Self {
        let by_key = Self::index_keys(records);

        let mut by_slug = HashMap::new();
        let mut by_title = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            if let Some(title) = record.title() {
                by_slug.entry(slugify(title)).or_insert(pos);
                by_title.entry(title.to_lowercase()).or_insert(pos);
            }
        }

        let mut by_override = HashMap::new();
        for (raw, target) in &overrides.entries {
            let pos = by_key
                .get(target.as_str())
                .or_else(|| by_title.get(&target.to_lowercase()))
                .copied();
            match pos {
                Some(pos) => {
                    by_override.insert(raw.clone(), pos);
                }
                None => tracing::debug!(
                    raw = %raw,
                    target = %target,
                    version = overrides.version,
                    "override target not in collection"
                ),
            }
        }

        Self {
            records,
            by_key,
            by_slug,
            by_override,
        }
    }

    /// Primary key only, for joins between opaque ids
    pub fn exact(records: &'a [T]) -> Self {
        Self {
            records,
            by_key: Self::index_keys(records),
            by_slug: HashMap::new(),
            by_override: HashMap::new(),
        }
    }

    fn index_keys(records: &'a [T]) -> HashMap<&'a str, usize> {
        let mut by_key = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if let Some(key) = record.primary_key() {
                by_key.entry(key).or_insert(pos);
            }
        }
        by_key
    }

    /// Resolve `raw_id`, first matching rule wins
    pub fn resolve(&self, raw_id: &str) -> Result<Resolution<'a, T>> {
        if raw_id.is_empty() {
            return Err(MarketError::NotFound(String::new()));
        }

        let hit = if let Some(&pos) = self.by_key.get(raw_id) {
            Some((pos, MatchRule::PrimaryKey))
        } else if let Some(&pos) = self.by_slug.get(raw_id) {
            Some((pos, MatchRule::Slug))
        } else {
            self.by_override
                .get(raw_id)
                .map(|&pos| (pos, MatchRule::Override))
        };

        hit.map(|(pos, rule)| Resolution {
            record: &self.records[pos],
            rule,
        })
        .ok_or_else(|| MarketError::NotFound(raw_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog_store::test_support::make_service;
    use crate::types::ApplicationStatus;
    use chrono::{TimeZone, Utc};

    fn services() -> Vec<Service> {
        vec![
            make_service("svc-1", "cleaning", "Basic Cleaning Service", 6900),
            make_service("svc-2", "cleaning", "Deep Cleaning", 14900),
            make_service("svc-3", "handyman", "TV Wall Mounting", 7500),
        ]
    }

    #[test]
    fn test_primary_key_match() {
        let services = services();
        let resolver = KeyResolver::new(&services, &OverrideTable::builtin());

        let hit = resolver.resolve("svc-2").unwrap();

        assert_eq!(hit.record.id, "svc-2");
        assert_eq!(hit.rule, MatchRule::PrimaryKey);
    }

    #[test]
    fn test_slug_match() {
        let services = services();
        let resolver = KeyResolver::new(&services, &OverrideTable::builtin());

        let hit = resolver.resolve("tv-wall-mounting").unwrap();

        assert_eq!(hit.record.id, "svc-3");
        assert_eq!(hit.rule, MatchRule::Slug);
    }

    #[test]
    fn test_override_when_slug_differs() {
        // "Basic Cleaning Service" slugifies to "basic-cleaning-service",
        // so "basic-cleaning" only resolves through the override table
        let services = services();
        let resolver = KeyResolver::new(&services, &OverrideTable::builtin());

        let hit = resolver.resolve("basic-cleaning").unwrap();

        assert_eq!(hit.record.id, "svc-1");
        assert_eq!(hit.rule, MatchRule::Override);
    }

    #[test]
    fn test_slug_beats_override() {
        let services = vec![
            make_service("svc-1", "cleaning", "Basic Cleaning", 5000),
            make_service("svc-9", "cleaning", "Basic Cleaning Service", 6900),
        ];
        let resolver = KeyResolver::new(&services, &OverrideTable::builtin());

        let hit = resolver.resolve("basic-cleaning").unwrap();

        assert_eq!(hit.record.id, "svc-1");
        assert_eq!(hit.rule, MatchRule::Slug);
    }

    #[test]
    fn test_primary_key_beats_slug() {
        let services = vec![
            make_service("other", "x", "Deep Cleaning", 100),
            make_service("deep-cleaning", "x", "Something Else", 200),
        ];
        let resolver = KeyResolver::new(&services, &OverrideTable::empty());

        let hit = resolver.resolve("deep-cleaning").unwrap();

        assert_eq!(hit.record.id, "deep-cleaning");
        assert_eq!(hit.rule, MatchRule::PrimaryKey);
    }

    #[test]
    fn test_override_target_by_id() {
        let services = services();
        let mut overrides = OverrideTable::empty();
        overrides
            .entries
            .insert("legacy-42".to_string(), "svc-2".to_string());
        let resolver = KeyResolver::new(&services, &overrides);

        let hit = resolver.resolve("legacy-42").unwrap();

        assert_eq!(hit.record.id, "svc-2");
        assert_eq!(hit.rule, MatchRule::Override);
    }

    #[test]
    fn test_override_target_title_case_insensitive() {
        let services = services();
        let mut overrides = OverrideTable::empty();
        overrides
            .entries
            .insert("wall-tv".to_string(), "tv wall mounting".to_string());
        let resolver = KeyResolver::new(&services, &overrides);

        assert_eq!(resolver.resolve("wall-tv").unwrap().record.id, "svc-3");
    }

    #[test]
    fn test_override_with_missing_target_is_skipped() {
        let services = services();
        let mut overrides = OverrideTable::empty();
        overrides
            .entries
            .insert("ghost".to_string(), "Ghost Service".to_string());
        let resolver = KeyResolver::new(&services, &overrides);

        assert!(matches!(
            resolver.resolve("ghost"),
            Err(MarketError::NotFound(raw)) if raw == "ghost"
        ));
    }

    #[test]
    fn test_no_match_is_not_found() {
        let services = services();
        let resolver = KeyResolver::new(&services, &OverrideTable::builtin());

        assert!(resolver.resolve("window-washing").is_err());
    }

    #[test]
    fn test_empty_raw_id_is_not_found() {
        let services = vec![make_service("svc-1", "x", "!!!", 100)];
        let resolver = KeyResolver::new(&services, &OverrideTable::empty());

        assert!(resolver.resolve("").is_err());
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let services = vec![
            make_service("a", "x", "Same Title", 100),
            make_service("b", "x", "Same Title", 200),
        ];
        let resolver = KeyResolver::new(&services, &OverrideTable::empty());

        assert_eq!(resolver.resolve("same-title").unwrap().record.id, "a");
    }

    #[test]
    fn test_exact_mode_skips_slug() {
        let services = services();
        let resolver = KeyResolver::exact(&services);

        assert!(resolver.resolve("svc-1").is_ok());
        assert!(resolver.resolve("deep-cleaning").is_err());
        assert!(resolver.resolve("basic-cleaning").is_err());
    }

    #[test]
    fn test_applications_resolve_by_converted_user() {
        let make_app = |id: &str, user: Option<&str>| ProApplication {
            application_id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            services: Vec::new(),
            experience: None,
            status: ApplicationStatus::Approved,
            reviewed_at: None,
            converted_user_id: user.map(String::from),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let apps = vec![
            make_app("app-1", None),
            make_app("app-2", Some("user-7")),
            make_app("app-3", Some("user-7")),
        ];
        let resolver = KeyResolver::exact(&apps);

        let hit = resolver.resolve("user-7").unwrap();
        assert_eq!(hit.record.application_id, "app-2");
        assert!(resolver.resolve("app-1").is_err());
    }
}
