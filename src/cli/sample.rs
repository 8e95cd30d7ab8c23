//! Sample command handler
//!
//! Draws random points inside Latvia without calling the content provider.

use crate::config::Config;
use crate::coord::sampler::sample_points;
use crate::error::Result;
use crate::rng::get_source;
use clap::Args;

/// Sample command arguments
#[derive(Args)]
pub struct SampleArgs {
    /// Number of points
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Run the sample command
pub fn run(args: SampleArgs) -> Result<()> {
    let config = Config::load()?;
    let source = get_source(args.seed);
    let points = sample_points(args.count, config.explore.max_attempts, source.as_ref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        for point in points {
            println!("{:.6}, {:.6}", point.lat, point.lng);
        }
    }

    Ok(())
}
