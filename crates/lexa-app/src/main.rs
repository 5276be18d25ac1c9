use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lexa_core::LexiconLoader;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod backend;
pub mod commands;
pub mod controller;
pub mod events;
pub mod settings;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::args::{Cli, Commands, join_word};
use self::backend::{Backend, build_translator};
use self::controller::AppController;
use self::state::AppState;

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LEXA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if atty::is(atty::Stream::Stderr) {
        builder.init();
    } else {
        builder.json().init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("lexa: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = settings::load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let lexicon = LexiconLoader::load_with_additional(
        Path::new(&config.lexicon.path),
        &config.lexicon.additional_paths,
    )
    .with_context(|| format!("cannot load word dataset {}", config.lexicon.path))?;
    tracing::info!("Lexicon ready: {} words", lexicon.len());

    let state = Arc::new(AppState::new(config, lexicon));

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Lookup { word } => commands::lookup(&state, &join_word(&word)),
        Commands::Bookmark { word } => commands::bookmark(&state, &join_word(&word)),
        Commands::Bookmarks => commands::bookmarks(&state),
        Commands::Unbookmark { word, yes } => commands::unbookmark(&state, &join_word(&word), yes),
        Commands::Translate { word, to } => commands::translate(&state, &join_word(&word), to).await,
        Commands::Interactive => interactive(state).await,
    }
}

async fn interactive(state: Arc<AppState>) -> anyhow::Result<()> {
    let bookmarks = commands::open_bookmarks(&state)?;
    let translator = build_translator(&state.config.translator);
    let (backend, translations) = Backend::new(state.clone(), bookmarks, translator);

    let controller = AppController::new(state.config.event_capacity);
    let cancel = controller.cancel_token();
    let mut tasks = controller.spawn_tasks(backend, translations);

    let mut failure = None;
    loop {
        tokio::select! {
            _ = signal::ctrl_c(), if !cancel.is_cancelled() => {
                tracing::info!("Shutdown requested");
                cancel.cancel();
            }
            result = tasks.join_next() => match result {
                None => break,
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(e))) => {
                    tracing::error!("task exited: {e:#}");
                    cancel.cancel();
                    failure.get_or_insert(e);
                }
                Some(Err(e)) => {
                    tracing::error!("task panicked: {e}");
                    cancel.cancel();
                }
            }
        }
    }

    failure.map_or(Ok(()), Err)
}
