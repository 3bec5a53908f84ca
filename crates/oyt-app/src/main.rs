use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use oyt_config::Config;
use oyt_translator::{AUTO, SUPPORTED_LANGUAGES, TranslationRequest, language_name};
use tokio::io::BufReader;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod oneshot;
pub mod session;
pub mod state;
pub mod store;

use self::oneshot::Outcome;
use self::session::{PageChoice, SessionOptions};
use self::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "oyt",
    version,
    about = "Inline machine translation for studio title and description fields"
)]
struct Cli {
    /// JSON config file; environment variables still override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate text once and print the result
    Translate {
        /// Source language code, `auto` to detect
        #[arg(long, default_value = AUTO)]
        from: String,
        /// Target language code; defaults to the configured one
        #[arg(long)]
        to: Option<String>,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List the languages offered in the selectors
    Languages,
    /// Drive the translators against a virtual studio page from stdin
    Session {
        #[arg(long, value_enum, default_value_t = PageChoice::Edit)]
        page: PageChoice,
        #[arg(long, default_value = "dQw4w9WgXcQ")]
        video_id: String,
        /// Label shown as the target language on the translations page
        #[arg(long, default_value = "German")]
        target_language: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if std::env::var("OYT_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(Config::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("failed to load .env: {e}"),
    }

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Languages => {
            for language in SUPPORTED_LANGUAGES {
                println!("{}\t{}", language.code, language.name);
            }
            Ok(())
        }
        Command::Translate { from, to, text } => {
            config.validate().context("invalid configuration")?;
            let to = to.unwrap_or_else(|| config.translator.default_to_language.clone());
            if language_name(&to).is_none() {
                tracing::warn!(%to, "target language is not in the supported list");
            }

            let state = AppState::new(config).await?;
            let request = TranslationRequest::new(text.join(" "), from, to);
            let outcome = oneshot::translate_once(state.translator.as_ref(), request)
                .await
                .context("translation failed")?;

            match &outcome {
                Outcome::Blank => tracing::info!("Waiting for content to translate"),
                Outcome::Unchanged(_) => {
                    tracing::info!("Source and target languages are the same")
                }
                Outcome::Translated(translation) => {
                    tracing::info!("{}", oneshot::describe(translation))
                }
            }
            if let Some(text) = outcome.text() {
                println!("{text}");
            }
            Ok(())
        }
        Command::Session {
            page,
            video_id,
            target_language,
        } => {
            config.validate().context("invalid configuration")?;
            let state = AppState::new(config).await?;

            // Shutdown future (Ctrl+C)
            let shutdown = async {
                if let Err(e) = signal::ctrl_c().await {
                    tracing::error!("failed to listen for ctrl+c: {e}");
                    std::future::pending::<()>().await;
                }
            };

            let options = SessionOptions {
                page,
                video_id,
                target_language,
            };
            let stdin = BufReader::new(tokio::io::stdin());
            session::run(state, options.studio(), stdin, shutdown).await
        }
    }
}

#[cfg(test)]
mod tests;
