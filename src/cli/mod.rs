mod quote;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketview::services::{
    BookingViewAggregator, CatalogSelector, CustomerStatsAggregator, FeeSelection,
    MarketConfig, ProAccountAggregator, Snapshot, SnapshotLoader,
};
use marketview::types::{Outcome, Warning};

use quote::QuoteArgs;

/// Catalog pricing and dashboard views for the service marketplace
#[derive(Parser)]
#[command(name = "marketview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Snapshot directory (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (default: ~/.marketview/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a service with addons
    Quote(QuoteArgs),

    /// List a category, featured service first
    Category {
        /// Category slug (exact match)
        slug: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories with service counts
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bookings with service titles and payment info
    Bookings {
        /// Which transaction supplies the platform fee
        #[arg(long, value_enum)]
        fee: Option<FeeArg>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Customers with lifetime statistics
    Customers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Professional accounts with their applications
    Pros {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FeeArg {
    FirstFetched,
    MostRecent,
}

impl From<FeeArg> for FeeSelection {
    fn from(arg: FeeArg) -> Self {
        match arg {
            FeeArg::FirstFetched => FeeSelection::FirstFetched,
            FeeArg::MostRecent => FeeSelection::MostRecent,
        }
    }
}

impl Cli {
    /// Logs go to stderr. `MARKETVIEW_LOG` (or `RUST_LOG`) overrides the level.
    pub fn init_logging(&self) {
        let default = if self.verbose {
            "marketview=debug"
        } else {
            "marketview=warn"
        };
        let filter = EnvFilter::try_from_env("MARKETVIEW_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| default.into());

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init();
    }

    pub fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => MarketConfig::load_from(path)?,
            None => MarketConfig::load()?,
        };
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => config.data_dir()?,
        };
        let loader = SnapshotLoader::new(data_dir);

        match self.command {
            Commands::Quote(args) => {
                let catalog = loader.load_catalog()?;
                args.run(&catalog)
            }
            Commands::Category { slug, json } => {
                let catalog = loader.load_catalog()?;
                let listing = CatalogSelector::new(&catalog).featured(&slug);
                if json {
                    render::print_json(&Outcome::Ok(listing))
                } else {
                    render::print_featured(&slug, &listing);
                    Ok(())
                }
            }
            Commands::Categories { json } => {
                let catalog = loader.load_catalog()?;
                let categories = CatalogSelector::new(&catalog).categories();
                if json {
                    render::print_json(&Outcome::Ok(categories))
                } else {
                    render::print_categories(&categories);
                    Ok(())
                }
            }
            Commands::Bookings { fee, json } => {
                let (snapshot, load_warnings) = load_snapshot(&loader)?;
                let fee_selection = fee.map(FeeSelection::from).unwrap_or(config.fee_selection);
                let outcome = BookingViewAggregator::new(&config.overrides)
                    .with_fee_selection(fee_selection)
                    .build(
                        &snapshot.bookings_newest_first(),
                        snapshot.catalog.services(),
                        &snapshot.transactions,
                    )
                    .with_warnings(load_warnings);
                emit(outcome, json, render::print_bookings)
            }
            Commands::Customers { json } => {
                let (snapshot, load_warnings) = load_snapshot(&loader)?;
                let outcome =
                    CustomerStatsAggregator::build(&snapshot.customers(), &snapshot.bookings)
                        .with_warnings(load_warnings);
                emit(outcome, json, render::print_customers)
            }
            Commands::Pros { json } => {
                let (snapshot, load_warnings) = load_snapshot(&loader)?;
                let outcome = ProAccountAggregator::build(
                    &snapshot.professionals(),
                    &snapshot.converted_applications(),
                )
                .with_warnings(load_warnings);
                emit(outcome, json, render::print_pro_accounts)
            }
        }
    }
}

fn load_snapshot(loader: &SnapshotLoader) -> anyhow::Result<(Snapshot, Vec<Warning>)> {
    Ok(loader.load()?.into_parts())
}

/// Print a report; degraded results are still printed, with warnings logged
fn emit<T: serde::Serialize>(
    outcome: Outcome<Vec<T>>,
    json: bool,
    print_text: impl FnOnce(&[T]),
) -> anyhow::Result<()> {
    if json {
        return render::print_json(&outcome);
    }
    render::log_warnings(outcome.warnings());
    print_text(outcome.value().as_slice());
    Ok(())
}
