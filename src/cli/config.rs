//! Config command handler
//!
//! `latvia-explorer config` prints every key, `config <key>` one value and
//! `config <key> <value>` stores a new one. The API key is masked on output.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

const SECRET_KEYS: [&str; 1] = ["api_keys.gemini"];

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Key in `section.key` form, e.g. "explore.nearby_limit"
    pub key: Option<String>,

    /// New value for the key
    pub value: Option<String>,

    /// Print the path of the config file
    #[arg(long)]
    pub path: bool,

    /// Overwrite the config file with defaults
    #[arg(long)]
    pub reset: bool,

    /// Print secrets unmasked
    #[arg(long)]
    pub reveal: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key.as_deref(), args.value.as_deref()) {
        (None, None) => {
            for line in render(&config, args.reveal) {
                println!("{}", line);
            }
        }
        (Some(key), None) => {
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", display_value(key, &value, args.reveal));
        }
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, display_value(key, value, args.reveal));
        }
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {} (available: {})",
        key,
        Config::available_keys().join(", ")
    ))
}

fn display_value(key: &str, value: &str, reveal: bool) -> String {
    if reveal || !SECRET_KEYS.contains(&key) {
        value.to_string()
    } else if value.is_empty() {
        "(not set)".to_string()
    } else {
        "***".to_string()
    }
}

/// `key = value` lines for every key, then the map URL templates
fn render(config: &Config, reveal: bool) -> Vec<String> {
    let mut lines: Vec<String> = Config::available_keys()
        .into_iter()
        .filter_map(|key| {
            config
                .get(key)
                .map(|value| format!("{} = {}", key, display_value(key, &value, reveal)))
        })
        .collect();

    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    lines.extend(
        providers
            .into_iter()
            .map(|(name, template)| format!("url.providers.{} = {}", name, template)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_masked() {
        assert_eq!(display_value("api_keys.gemini", "abc", false), "***");
        assert_eq!(display_value("api_keys.gemini", "", false), "(not set)");
        assert_eq!(display_value("api_keys.gemini", "abc", true), "abc");
        assert_eq!(display_value("server.port", "7979", false), "7979");
    }

    #[test]
    fn test_render_lists_every_key() {
        let mut config = Config::default();
        config.api_keys.gemini = "secret".to_string();

        let lines = render(&config, false);
        for key in Config::available_keys() {
            assert!(lines.iter().any(|l| l.starts_with(&format!("{} = ", key))));
        }
        assert!(lines.contains(&"api_keys.gemini = ***".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("url.providers.openstreetmap = ")));
    }

    #[test]
    fn test_unknown_key_lists_available() {
        let message = unknown_key("explore.radius").to_string();
        assert!(message.contains("explore.radius"));
        assert!(message.contains("explore.nearby_limit"));
    }
}
