//! Snapshot loading from exported JSON collections
//!
//! Each collection is either a single `<name>.json` array or a directory
//! `<name>/` of `*.json` shard arrays, concatenated in sorted path order.
//! A file that cannot be read is skipped and reported as a warning, and so
//! is each record that does not match the schema. Only the catalog is
//! strict: any unreadable file or record in it is a hard error.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use simd_json::OwnedValue;

use crate::services::CatalogStore;
use crate::types::{
    Booking, MarketError, Outcome, ProApplication, Result, Service, Transaction, User, UserRole,
    Warning,
};

pub const SERVICES: &str = "services";
pub const BOOKINGS: &str = "bookings";
pub const TRANSACTIONS: &str = "transactions";
pub const USERS: &str = "users";
pub const APPLICATIONS: &str = "applications";

/// Immutable set of collections fetched together
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub catalog: CatalogStore,
    pub bookings: Vec<Booking>,
    pub transactions: Vec<Transaction>,
    pub users: Vec<User>,
    pub applications: Vec<ProApplication>,
}

impl Snapshot {
    /// Users with the customer role, in snapshot order
    pub fn customers(&self) -> Vec<User> {
        self.users_with_role(UserRole::Customer)
    }

    /// Users with the professional role, in snapshot order
    pub fn professionals(&self) -> Vec<User> {
        self.users_with_role(UserRole::Professional)
    }

    /// Approved applications linked to a user account
    pub fn converted_applications(&self) -> Vec<ProApplication> {
        self.applications
            .iter()
            .filter(|a| a.is_converted())
            .cloned()
            .collect()
    }

    /// Bookings sorted newest first, as the dashboard lists them
    pub fn bookings_newest_first(&self) -> Vec<Booking> {
        let mut bookings = self.bookings.clone();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }

    fn users_with_role(&self, role: UserRole) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect()
    }
}

/// Reads a [`Snapshot`] from a data directory
pub struct SnapshotLoader {
    data_dir: PathBuf,
}

impl SnapshotLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every collection. Missing or unreadable collections degrade the
    /// outcome; a missing catalog falls back to the seed catalog.
    pub fn load(&self) -> Result<Outcome<Snapshot>> {
        let catalog = self.load_catalog()?;
        let mut warnings = Vec::new();

        let snapshot = Snapshot {
            catalog,
            bookings: self.load_collection(BOOKINGS, &mut warnings),
            transactions: self.load_collection(TRANSACTIONS, &mut warnings),
            users: self.load_collection(USERS, &mut warnings),
            applications: self.load_collection(APPLICATIONS, &mut warnings),
        };

        tracing::debug!(
            services = snapshot.catalog.len(),
            bookings = snapshot.bookings.len(),
            transactions = snapshot.transactions.len(),
            users = snapshot.users.len(),
            applications = snapshot.applications.len(),
            "snapshot loaded"
        );

        Ok(Outcome::new(snapshot, warnings))
    }

    /// Load only the catalog, falling back to the seed catalog when none was
    /// exported. A partially readable catalog is rejected, not trimmed.
    pub fn load_catalog(&self) -> Result<CatalogStore> {
        if self.collection_files(SERVICES).is_empty() {
            tracing::info!(
                data_dir = %self.data_dir.display(),
                "no exported catalog, using seed catalog"
            );
            return CatalogStore::seed();
        }

        let mut warnings = Vec::new();
        let services: Vec<Service> = self.load_collection(SERVICES, &mut warnings);
        if !warnings.is_empty() {
            let reasons: Vec<String> = warnings.iter().map(ToString::to_string).collect();
            return Err(MarketError::InvalidCatalog(reasons.join("; ")));
        }
        CatalogStore::new(services)
    }

    /// `<name>.json` if present, otherwise the sorted shards in `<name>/`
    pub fn collection_files(&self, name: &str) -> Vec<PathBuf> {
        let single = self.data_dir.join(format!("{}.json", name));
        if single.is_file() {
            return vec![single];
        }

        let pattern = self.data_dir.join(name).join("*.json");
        let mut shards: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).collect())
            .unwrap_or_default();
        shards.sort();
        shards
    }

    /// Parse all files of a collection in parallel, keeping file order.
    /// Failed files and malformed records are skipped with a warning.
    fn load_collection<T>(&self, name: &str, warnings: &mut Vec<Warning>) -> Vec<T>
    where
        T: DeserializeOwned + Send,
    {
        let files = self.collection_files(name);
        if files.is_empty() {
            tracing::warn!(collection = name, "no snapshot file found");
            warnings.push(Warning::CollectionUnavailable {
                collection: name.to_string(),
                reason: "no snapshot file".into(),
            });
            return Vec::new();
        }

        let parsed: Vec<(PathBuf, Result<ParsedFile<T>>)> = files
            .into_par_iter()
            .map(|path| {
                let records = parse_file(&path);
                (path, records)
            })
            .collect();

        let mut records = Vec::new();
        for (path, result) in parsed {
            match result {
                Ok(mut parsed) => {
                    records.append(&mut parsed.records);
                    if let Some(first_error) = parsed.first_error {
                        tracing::warn!(
                            collection = name,
                            path = %path.display(),
                            skipped = parsed.skipped,
                            "skipping malformed records"
                        );
                        warnings.push(Warning::SkippedRecords {
                            collection: name.to_string(),
                            file: path.display().to_string(),
                            skipped: parsed.skipped,
                            first_error,
                        });
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        collection = name,
                        path = %path.display(),
                        error = %e,
                        "skipping unreadable snapshot file"
                    );
                    warnings.push(Warning::CollectionUnavailable {
                        collection: name.to_string(),
                        reason: format!("{}: {}", path.display(), e),
                    });
                }
            }
        }
        records
    }
}

/// Records of one snapshot file that matched the schema
struct ParsedFile<T> {
    records: Vec<T>,
    skipped: usize,
    first_error: Option<String>,
}

/// Read a JSON array under a shared lock so a concurrent export holding an
/// exclusive lock is never read half-written.
///
/// The array itself must parse; its elements are deserialized one by one and
/// those that fail are counted instead of failing the whole file.
fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<ParsedFile<T>> {
    let file = File::open(path)?;
    FileExt::lock_shared(&file)?;

    let mut content = Vec::new();
    let read = std::io::BufReader::new(&file).read_to_end(&mut content);
    let _ = FileExt::unlock(&file);
    read?;

    let mut parsed = ParsedFile {
        records: Vec::new(),
        skipped: 0,
        first_error: None,
    };
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(parsed);
    }

    let values: Vec<OwnedValue> =
        simd_json::from_slice(&mut content).map_err(|e| MarketError::Parse(e.to_string()))?;
    parsed.records.reserve(values.len());
    for value in values {
        match simd_json::serde::from_owned_value::<T>(value) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                parsed.skipped += 1;
                parsed.first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }
    Ok(parsed)
}
