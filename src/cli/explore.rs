//! Explore command handler
//!
//! Runs one query against the content provider and prints the result.

use crate::config::Config;
use crate::constants::region::REGION_NAMES;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::explorer::{ExploreRequest, ExploreSettings, Explorer};
use crate::format::{available_formats, get_formatter};
use crate::history::History;
use crate::provider::gemini::GeminiProvider;
use crate::provider::LocationType;
use clap::Args;
use tracing::warn;

/// Explore command arguments
#[derive(Args)]
pub struct ExploreArgs {
    /// Look up a named place instead of a random one
    #[arg(long)]
    pub name: Option<String>,

    /// Latitude of the search center
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the search center
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Region or category filter (repeatable)
    #[arg(long = "filter", short = 'F')]
    pub filters: Vec<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Don't save to history
    #[arg(long)]
    pub no_history: bool,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available filters
    #[arg(long = "list-filters")]
    pub list_filters: bool,

    /// List available formats
    #[arg(long = "list-formats")]
    pub list_formats: bool,
}

impl ExploreArgs {
    fn request(&self) -> ExploreRequest {
        let coords = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };

        ExploreRequest {
            coords,
            target_name: self.name.clone(),
            filters: self.filters.clone(),
        }
    }
}

/// Run the explore command
pub async fn run(args: ExploreArgs) -> Result<()> {
    if args.list_filters {
        list_filters();
        return Ok(());
    }

    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;

    let format = args.format.clone().unwrap_or(config.explore.format.clone());
    let formatter =
        get_formatter(&format).ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let provider = GeminiProvider::from_config(&config)?;
    let explorer = Explorer::new(provider, ExploreSettings::from_config(&config));

    let location = explorer.explore(args.request()).await?;

    if !args.no_history {
        let saved = History::load().and_then(|mut history| {
            history.add_location(location.clone());
            history.save()
        });
        if let Err(e) = saved {
            warn!(error = %e, "Could not save history");
        }
    }

    let output = formatter.format(&location, &config)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output.trim_end());
    }

    Ok(())
}

/// Print available filters
fn list_filters() {
    println!("Regions:");
    for region in REGION_NAMES {
        println!("  {}", region);
    }
    println!("\nCategories:");
    for kind in LocationType::ALL {
        println!("  {:10} - {}", kind, kind.label());
    }
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
