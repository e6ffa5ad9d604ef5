//! `marketview quote` subcommand

use clap::Args;
use serde::Serialize;

use marketview::services::{CatalogStore, PricingEngine};
use marketview::types::{AddonSelection, PriceQuote};

use super::render::format_cents;

/// Price a service with optional addons
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Service id to price
    #[arg(value_name = "SERVICE_ID")]
    pub service_id: String,

    /// Addon quantity as ID=QTY (ID alone means 1); repeatable
    #[arg(long = "addon", value_name = "ID=QTY", value_parser = parse_addon)]
    pub addons: Vec<(String, u32)>,

    /// Reject selections over an addon's max quantity or missing required addons
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct QuoteOutput<'a> {
    service_id: &'a str,
    title: &'a str,
    #[serde(flatten)]
    quote: PriceQuote,
}

impl QuoteArgs {
    pub fn run(self, catalog: &CatalogStore) -> anyhow::Result<()> {
        let selection: AddonSelection = self.addons.into_iter().collect();
        let engine = PricingEngine::new(catalog);

        let quote = if self.strict {
            engine.compute_checked(&self.service_id, &selection)?
        } else {
            engine.compute_total(&self.service_id, &selection)?
        };

        // compute_* already failed if the id were unknown
        let title = catalog
            .get(&self.service_id)
            .map(|s| s.title_en.as_str())
            .unwrap_or_default();

        if self.json {
            let output = QuoteOutput {
                service_id: &self.service_id,
                title,
                quote,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{} ({})", title, self.service_id);
            println!("  Total:    {}", format_cents(quote.total_price_cents));
            println!("  Duration: {} min", quote.total_duration_minutes);
        }

        Ok(())
    }
}

/// Parse `ID=QTY`, or a bare `ID` meaning quantity 1
fn parse_addon(raw: &str) -> Result<(String, u32), String> {
    let (id, qty) = match raw.split_once('=') {
        Some((id, qty)) => {
            let qty = qty
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid quantity '{}': {}", qty, e))?;
            (id.trim(), qty)
        }
        None => (raw.trim(), 1),
    };
    if id.is_empty() {
        return Err("addon id must not be empty".into());
    }
    Ok((id.to_string(), qty))
}
