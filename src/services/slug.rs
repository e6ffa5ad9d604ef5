//! Slug derivation
//!
//! Turns a human title into the URL-safe key older booking rows were
//! written with, so those rows can still be joined to the catalog.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

/// Slugify a title.
///
/// Transformations, in order:
/// - Lowercase
/// - Each whitespace run to a single hyphen
/// - Drop everything outside `[a-z0-9-]`
///
/// # Examples
/// ```
/// use marketview::services::slug::slugify;
///
/// assert_eq!(slugify("Basic Cleaning Service"), "basic-cleaning-service");
/// assert_eq!(slugify("AC Repair (Split)"), "ac-repair-split");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lowered, "-");
    DISALLOWED.replace_all(&hyphenated, "").into_owned()
}
