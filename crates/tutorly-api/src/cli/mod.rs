//! CLI definitions for the `tutorly` binary.
//!
//! Every server setting can also come from the environment, so a plain
//! `.env`-style deployment works without flags.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use secrecy::SecretString;

use tutorly_core::service::auth::{DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS};
use tutorly_infra::llm::gemini::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use tutorly_infra::llm::ProviderSettings;
use tutorly_observe::LogFormat;

/// Study-session backend with an AI tutor.
#[derive(Parser)]
#[command(name = "tutorly", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for debug, -vv for trace). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long, global = true, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve(ServeArgs),

    /// Apply database migrations and exit.
    Migrate {
        #[command(flatten)]
        database: DatabaseArgs,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Args, Clone, Debug)]
pub struct DatabaseArgs {
    /// SQLite URL. Defaults to `tutorly.db` in the data directory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    pub fn resolve(&self) -> String {
        self.database_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(tutorly_infra::config::default_database_url)
    }
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Host to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Gemini API key. Chat requests fail until one is set.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model id.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Gemini API base URL.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Lifetime of issued bearer tokens, in hours (at most ten years).
    #[arg(
        long,
        env = "TOKEN_TTL_HOURS",
        default_value_t = DEFAULT_TOKEN_TTL_HOURS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_HOURS)
    )]
    pub token_ttl_hours: i64,

    /// Give up on a tutor request after this many seconds. No limit when unset.
    #[arg(long, env = "AI_TIMEOUT_SECS")]
    pub ai_timeout_secs: Option<u64>,
}

impl ServeArgs {
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout: self.ai_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn api_key(&self) -> Option<SecretString> {
        self.gemini_api_key
            .as_ref()
            .map(|key| SecretString::from(key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "tutorly",
            "serve",
            "--port",
            "8080",
            "--gemini-model",
            "gemini-pro",
            "--ai-timeout-secs",
            "30",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8080);
        let settings = args.provider_settings();
        assert_eq!(settings.model, "gemini-pro");
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_explicit_database_url_wins() {
        let args = DatabaseArgs {
            database_url: Some("sqlite::memory:".to_string()),
        };
        assert_eq!(args.resolve(), "sqlite::memory:");

        let blank = DatabaseArgs {
            database_url: Some("  ".to_string()),
        };
        assert!(blank.resolve().ends_with("tutorly.db?mode=rwc"));
    }

    #[test]
    fn test_log_format_flag() {
        let cli = Cli::try_parse_from(["tutorly", "--log-format", "json", "migrate"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_token_ttl_bounds() {
        let parse = |ttl: &str| {
            Cli::try_parse_from(["tutorly", "serve", "--token-ttl-hours", ttl]).map(|cli| {
                match cli.command {
                    Commands::Serve(args) => args.token_ttl_hours,
                    _ => panic!("expected serve"),
                }
            })
        };
        assert_eq!(parse("48").unwrap(), 48);
        assert_eq!(parse(&MAX_TOKEN_TTL_HOURS.to_string()).unwrap(), MAX_TOKEN_TTL_HOURS);
        assert!(parse("0").is_err());
        assert!(parse("-1").is_err());
        assert!(parse("10000000000").is_err());
    }
}
