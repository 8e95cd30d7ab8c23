//! URL output formatter

use crate::config::defaults::DEFAULT_URL_ZOOM;
use crate::config::Config;
use crate::error::Result;
use crate::explorer::ResolvedLocation;
use crate::format::OutputFormatter;

/// URL formatter - outputs a map URL for the resolved location
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        location: &ResolvedLocation,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let at = location.final_coordinate;
        config.format_url(provider, at.lat, at.lng, DEFAULT_URL_ZOOM)
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the location"
    }

    fn format(&self, location: &ResolvedLocation, config: &Config) -> Result<String> {
        self.format_with_provider(location, config, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::sample_location;

    #[test]
    fn test_url_format_default_provider() {
        let output = UrlFormatter
            .format(&sample_location(), &Config::default())
            .unwrap();
        assert_eq!(output, "https://www.google.com/maps/@57.1836,24.8497,15z");
    }

    #[test]
    fn test_url_format_with_provider() {
        let output = UrlFormatter
            .format_with_provider(&sample_location(), &Config::default(), Some("openstreetmap"))
            .unwrap();
        assert_eq!(output, "https://www.openstreetmap.org/#map=15/57.1836/24.8497");
    }

    #[test]
    fn test_url_format_unknown_provider() {
        let result =
            UrlFormatter.format_with_provider(&sample_location(), &Config::default(), Some("bing"));
        assert!(result.is_err());
    }
}
