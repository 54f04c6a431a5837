use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use coralogix_sdk::{CoralogixClient, Region};
use std::time::Duration;

/// Command line, with every flag falling back to an environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "coralogix-mcp", version)]
#[command(about = "MCP server exposing Coralogix alerts, logs, metrics and traces", long_about = None)]
pub struct Cli {
    /// Coralogix API key
    #[arg(long, env = "CORALOGIX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Coralogix region (EUROPE, EUROPE2, INDIA, US, SINGAPORE)
    #[arg(long, env = "CORALOGIX_REGION", default_value = "EUROPE")]
    pub region: String,

    /// Override the region endpoint
    #[arg(long, env = "CORALOGIX_BASE_URL")]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "CORALOGIX_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log output format (written to stderr)
    #[arg(long, env = "CORALOGIX_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub region: Region,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let Some(api_key) = cli.api_key.filter(|key| !key.trim().is_empty()) else {
            bail!("CORALOGIX_API_KEY must be set");
        };

        let region: Region = cli
            .region
            .parse()
            .with_context(|| format!("Invalid CORALOGIX_REGION '{}'", cli.region))?;

        if cli.timeout_secs == 0 {
            bail!("CORALOGIX_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            api_key,
            region,
            base_url: cli.base_url.filter(|url| !url.trim().is_empty()),
            timeout: Duration::from_secs(cli.timeout_secs),
            log_format: cli.log_format,
        })
    }

    /// Build the upstream client this configuration describes.
    pub fn client(&self) -> Result<CoralogixClient> {
        let mut builder = CoralogixClient::builder()
            .api_key(self.api_key.clone())
            .region(self.region)
            .timeout(self.timeout);
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        builder.build().context("Failed to build Coralogix client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            api_key: Some("test-api-key".to_string()),
            region: "EUROPE".to_string(),
            base_url: None,
            timeout_secs: 30,
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn test_from_cli_defaults() {
        let config = ServerConfig::from_cli(cli()).unwrap();

        assert_eq!(config.region, Region::Europe);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.client().unwrap().base_url().as_str(),
            "https://api.coralogix.com/"
        );
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = ServerConfig::from_cli(Cli { api_key: None, ..cli() }).unwrap_err();
        assert_eq!(err.to_string(), "CORALOGIX_API_KEY must be set");

        let err = ServerConfig::from_cli(Cli {
            api_key: Some("   ".to_string()),
            ..cli()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "CORALOGIX_API_KEY must be set");
    }

    #[test]
    fn test_region_is_case_insensitive() {
        let config = ServerConfig::from_cli(Cli {
            region: "singapore".to_string(),
            ..cli()
        })
        .unwrap();
        assert_eq!(config.region, Region::Singapore);
    }

    #[test]
    fn test_invalid_region_lists_valid_ones() {
        let err = ServerConfig::from_cli(Cli {
            region: "MARS".to_string(),
            ..cli()
        })
        .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("Invalid CORALOGIX_REGION 'MARS'"));
        assert!(message.contains("EUROPE, EUROPE2, INDIA, US, SINGAPORE"));
    }

    #[test]
    fn test_base_url_overrides_region() {
        let config = ServerConfig::from_cli(Cli {
            region: "US".to_string(),
            base_url: Some("http://127.0.0.1:8080".to_string()),
            ..cli()
        })
        .unwrap();
        assert_eq!(
            config.client().unwrap().base_url().as_str(),
            "http://127.0.0.1:8080/"
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ServerConfig::from_cli(Cli {
            timeout_secs: 0,
            ..cli()
        })
        .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "coralogix-mcp",
            "--api-key",
            "flag-key",
            "--region",
            "india",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.api_key.as_deref(), Some("flag-key"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(ServerConfig::from_cli(cli).unwrap().region, Region::India);
    }
}
