//! Main Entrypoint for the Poetry Muse
//!
//! This binary is responsible for:
//! 1. Parsing the command line and loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Building the generation client, speech backend, and archive.
//! 4. Running the requested command: one-shot compose, style listing, or a session.

use anyhow::Context;
use clap::Parser;
use muse_core::{Muse, OllamaClient, Speaker, speech, style::StylePersona};
use muse_service::{
    app::App,
    archive::Archive,
    cli::{Cli, Commands},
    config::Config,
    render, repl,
    session::SessionSettings,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    cli.overrides.apply(&mut config);

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
    info!(
        model = %config.model,
        endpoint = %config.ollama_url,
        style = %config.style,
        mock = config.use_mock,
        "Configuration loaded"
    );

    if let Some(Commands::Styles) = &cli.command {
        for persona in StylePersona::ALL {
            println!("{:<14} {}", persona.label(), persona.instruction());
        }
        return Ok(());
    }

    // --- 3. Initialize Shared Services ---
    let client = OllamaClient::new(config.ollama()).context("Failed to build HTTP client")?;
    let muse = Muse::new(Arc::new(client), config.model.clone());
    let speaker = Speaker::new(speech::probe());
    let archive = Archive::new(config.poems_dir.clone());
    let settings = SessionSettings {
        style: config.style.clone(),
        use_mock: config.use_mock,
        archive: !cli.overrides.no_archive,
    };
    let mut app = App::new(muse, speaker, archive, settings);

    // --- 4. Run ---
    match cli.command {
        Some(Commands::Compose { topic, speak, json }) => {
            let composition = app.compose(&topic).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&composition)?);
            } else {
                let entry = app
                    .history
                    .get(0)
                    .context("Composed poem missing from history")?;
                print!("{}", render::entry_card(0, entry));
                if let Some(err) = &composition.archive_error {
                    eprintln!("Could not save file: {}", err);
                }
            }
            if speak {
                app.speak(&composition.poem);
                if let Some(job) = app.take_last_job() {
                    job.wait().await;
                }
            }
        }
        Some(Commands::Session) | None => {
            let stdin = BufReader::new(tokio::io::stdin());
            repl::run(&mut app, stdin, tokio::io::stdout()).await?;
        }
        Some(Commands::Styles) => {}
    }

    info!("Goodbye.");
    Ok(())
}
