//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::explorer::ResolvedLocation;
use crate::format::OutputFormatter;

/// JSON formatter - outputs the resolved location as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON location"
    }

    fn format(&self, location: &ResolvedLocation, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(location)?)
    }
}
