use thiserror::Error;

/// marketview error types
#[derive(Error, Debug)]
pub enum MarketError {
    /// Pricing was requested for a service id that is not in the catalog
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    /// A raw identifier matched no record by key, slug or override
    #[error("no record matches '{0}'")]
    NotFound(String),

    /// Selected quantity is above the addon's cap
    #[error("addon '{addon_id}' allows at most {max}, got {requested}")]
    AddonLimitExceeded {
        addon_id: String,
        requested: u32,
        max: u32,
    },

    /// A required addon was left out of the selection
    #[error("addon '{addon_id}' is required")]
    RequiredAddonMissing { addon_id: String },

    /// A quote total does not fit in i64 cents or minutes
    #[error("quote for '{service_id}' overflows")]
    QuoteOverflow { service_id: String },

    /// Catalog definitions violate an invariant (duplicate id, negative price)
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Failed to parse a JSON snapshot or config file
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for marketview
pub type Result<T> = std::result::Result<T, MarketError>;
