//! Command-line interface definition.

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "muse", version, about = "Collaborative AI poetry from a local Ollama model")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags that take precedence over the environment.
#[derive(Debug, Args, Default)]
pub struct Overrides {
    /// Ollama model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Generation endpoint URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Poetic persona
    #[arg(long, global = true)]
    pub style: Option<String>,

    /// Return a canned poem instead of calling Ollama
    #[arg(long, global = true)]
    pub mock: bool,

    /// Directory for archived poems
    #[arg(long, global = true)]
    pub poems_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Do not write poems to the archive directory
    #[arg(long, global = true)]
    pub no_archive: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(url) = &self.url {
            config.ollama_url = url.clone();
        }
        if let Some(style) = &self.style {
            config.style = style.clone();
        }
        if self.mock {
            config.use_mock = true;
        }
        if let Some(dir) = &self.poems_dir {
            config.poems_dir = dir.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = std::time::Duration::from_secs(secs);
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compose one poem and exit
    Compose {
        /// What the poem is about
        #[arg(long, short, value_parser = NonEmptyStringValueParser::new())]
        topic: String,

        /// Read the poem aloud before exiting
        #[arg(long)]
        speak: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the available personas
    Styles,
    /// Start an interactive session (the default)
    Session,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;
    use tracing::Level;

    fn base_config() -> Config {
        Config {
            model: "mistral:latest".to_string(),
            ollama_url: "http://localhost:11434/api/generate".to_string(),
            style: "Shakespearean".to_string(),
            use_mock: false,
            poems_dir: PathBuf::from("poems"),
            request_timeout: Duration::from_secs(120),
            log_level: Level::INFO,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compose() {
        let cli = Cli::try_parse_from([
            "muse", "compose", "--topic", "the sea", "--style", "Haiku Master", "--mock", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Compose { topic, speak, json }) => {
                assert_eq!(topic, "the sea");
                assert!(!speak);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.overrides.style.as_deref(), Some("Haiku Master"));
        assert!(cli.overrides.mock);
    }

    #[test]
    fn test_compose_rejects_empty_topic() {
        assert!(Cli::try_parse_from(["muse", "compose", "--topic", ""]).is_err());
        assert!(Cli::try_parse_from(["muse", "compose"]).is_err());
    }

    #[test]
    fn test_no_subcommand_means_session() {
        let cli = Cli::try_parse_from(["muse", "--model", "llama3"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.overrides.model.as_deref(), Some("llama3"));
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["muse", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = base_config();
        let cli = Cli::try_parse_from([
            "muse",
            "--model",
            "llama3",
            "--url",
            "http://box:11434/api/generate",
            "--style",
            "Surrealist",
            "--mock",
            "--poems-dir",
            "/tmp/out",
            "--timeout-secs",
            "9",
        ])
        .unwrap();
        cli.overrides.apply(&mut config);

        assert_eq!(config.model, "llama3");
        assert_eq!(config.ollama_url, "http://box:11434/api/generate");
        assert_eq!(config.style, "Surrealist");
        assert!(config.use_mock);
        assert_eq!(config.poems_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.request_timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = base_config();
        Overrides::default().apply(&mut config);
        assert_eq!(config.model, base_config().model);
        assert!(!config.use_mock);
    }
}
