//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::explorer::ResolvedLocation;
use crate::format::OutputFormatter;
use std::fmt::Write;

/// Text formatter - outputs a readable summary card
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, location: &ResolvedLocation, _config: &Config) -> Result<String> {
        let mut output = String::new();
        // Writing to a String cannot fail
        let _ = write_location(&mut output, location);
        Ok(output)
    }
}

fn write_location(out: &mut String, location: &ResolvedLocation) -> std::fmt::Result {
    writeln!(out, "{}", location.title)?;

    match location.region {
        Some(region) => writeln!(out, "{} · {}", location.location_type.label(), region)?,
        None => writeln!(out, "{}", location.location_type.label())?,
    }
    writeln!(
        out,
        "({:.5}, {:.5})",
        location.final_coordinate.lat, location.final_coordinate.lng
    )?;
    writeln!(out)?;
    writeln!(out, "{}", location.description)?;

    if !location.facts.is_empty() {
        writeln!(out, "\nFakti:")?;
        for fact in &location.facts {
            match &fact.source_url {
                Some(url) => writeln!(out, "  - {} [{}]", fact.text, url)?,
                None => writeln!(out, "  - {}", fact.text)?,
            }
        }
    }

    if !location.nearby_places.is_empty() {
        writeln!(out, "\nTuvumā:")?;
        for place in &location.nearby_places {
            writeln!(out, "  {:>8}  {} ({})", place.distance, place.name, place.place_type)?;
        }
    }

    if !location.sources.is_empty() {
        writeln!(out, "\nAvoti:")?;
        for source in &location.sources {
            writeln!(out, "  {} <{}>", source.title, source.uri)?;
        }
    }

    Ok(())
}
