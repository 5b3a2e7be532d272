//! Prompt Builder developer CLI.
//!
//! Binary name: `pbuild`
//!
//! Parses CLI arguments, loads configuration, initializes tracing and the
//! application state, then dispatches to the command handler.

mod cli;
mod state;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::generate;

use prompt_builder_infra::config::load_config;
use prompt_builder_infra::filesystem::resolve_data_dir;
use prompt_builder_observe::tracing_setup::{init_tracing, shutdown_tracing};
use prompt_builder_types::config::BuilderConfig;

use cli::{Cli, Commands, ParamsCommand, StoreCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "pbuild", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;

    if let Err(err) = init_tracing(&config.logging, cli::log_filter(cli.verbose, cli.quiet)) {
        eprintln!("Warning: failed to initialize tracing: {err}");
    }

    let result = run(cli, data_dir, config).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, data_dir: PathBuf, config: BuilderConfig) -> anyhow::Result<()> {
    let state = AppState::init(data_dir, config).await?;
    let json = cli.json;
    let session = cli.session.as_str();

    match cli.command {
        Commands::Encode { draft } => cli::codec::encode(&draft.into_draft()?, json)?,

        Commands::Decode { payload } => cli::codec::decode(&state, &payload, json)?,

        Commands::Params { action } => match action {
            ParamsCommand::To { draft } => cli::codec::params_to(&draft.into_draft()?, json)?,
            ParamsCommand::From { query } => cli::codec::params_from(&query, json)?,
        },

        Commands::Fingerprint { draft } => {
            cli::codec::fingerprint_draft(&state, &draft.into_draft()?, json)?;
        }

        Commands::Render { draft } => cli::text::render(&draft.into_draft()?, json)?,

        Commands::Import { path, save } => {
            cli::text::import(&state, &path, save, session, json)?;
        }

        Commands::Store { action } => match action {
            StoreCommand::List => cli::store::list(&state, json)?,
            StoreCommand::Show { id } => cli::store::show(&state, &id, json)?,
            StoreCommand::Save { draft } => {
                cli::store::save(&state, draft.into_draft()?, session, json)?;
            }
            StoreCommand::Delete { id } => cli::store::delete(&state, &id, json)?,
        },

        Commands::Publish { draft } => {
            cli::share::publish(&state, &draft.into_draft()?, session, json).await?;
        }

        Commands::Show { slug } => cli::share::show(&state, &slug, json).await?,

        Commands::Recent { limit } => cli::share::recent(&state, limit, json).await?,

        Commands::Analyze { draft } => {
            cli::analyze::analyze(&state, &draft.into_draft()?, json).await?;
        }

        Commands::Config => {
            let out = serde_json::json!({
                "data_dir": state.data_dir.display().to_string(),
                "config": state.config,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        // Handled in main before state init
        Commands::Completions { .. } => {}
    }

    Ok(())
}
