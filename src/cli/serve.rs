//! Serve command handler

use crate::config::Config;
use crate::error::{Error, Result};
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Gemini model for this run (overrides provider.model)
    #[arg(long)]
    pub model: Option<String>,
}

impl ServeArgs {
    /// Layer command-line overrides on top of the loaded configuration
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model) = self.model {
            if model.trim().is_empty() {
                return Err(Error::Config("--model must not be empty".to_string()));
            }
            config.provider.model = model;
        }
        Ok(())
    }
}

/// Run the web app in the foreground
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.provider.model,
        "Serving latvia-explorer on http://{}",
        config.server_addr()
    );

    server::run(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(host: Option<&str>, port: Option<u16>, model: Option<&str>) -> ServeArgs {
        ServeArgs {
            host: host.map(str::to_string),
            port,
            model: model.map(str::to_string),
        }
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        args(Some("0.0.0.0"), Some(8080), Some("gemini-2.5-flash"))
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.provider.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::default();
        args(None, None, None).apply(&mut config).unwrap();

        let defaults = Config::default();
        assert_eq!(config.server_addr(), defaults.server_addr());
        assert_eq!(config.provider.model, defaults.provider.model);
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = Config::default();
        assert!(args(None, None, Some(" ")).apply(&mut config).is_err());
    }
}
