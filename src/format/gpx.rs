//! GPX output formatter

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::explorer::ResolvedLocation;
use crate::format::OutputFormatter;

/// GPX formatter - outputs the place and its neighbours as waypoints
pub struct GpxFormatter;

/// Escape text for XML element content
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn push_waypoint(gpx: &mut String, at: Coordinates, name: &str, desc: &str, sym: &str) {
    gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, at.lat, at.lng));
    gpx.push('\n');
    gpx.push_str(&format!("    <name>{}</name>\n", escape(name)));
    if !desc.is_empty() {
        gpx.push_str(&format!("    <desc>{}</desc>\n", escape(desc)));
    }
    gpx.push_str(&format!("    <sym>{}</sym>\n", sym));
    gpx.push_str("  </wpt>\n");
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, location: &ResolvedLocation, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="latvia-explorer">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>{}</name>\n", escape(&location.title)));
        gpx.push_str(&format!("    <time>{}</time>\n", location.timestamp));
        gpx.push_str("  </metadata>\n");

        push_waypoint(
            &mut gpx,
            location.final_coordinate,
            &location.title,
            &location.description,
            "flag",
        );

        for place in &location.nearby_places {
            let desc = format!("{}, {}", place.place_type, place.distance);
            push_waypoint(&mut gpx, place.coordinates, &place.name, &desc, "waypoint");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
