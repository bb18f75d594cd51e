use std::fmt;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use weather_core::{Config, Resolver, Route};

use crate::{render::render_screen, session::Session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather and 7-day forecast by US zip code"
)]
pub struct Cli {
    /// Print debug logs to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a zip code once.
    Show {
        /// 5-digit US zip code; defaults to the configured one or 10001.
        #[arg(long)]
        zip_code: Option<String>,

        /// Also show wind, humidity, pressure and sun times.
        #[arg(long)]
        extra: bool,
    },

    /// Look up zip codes interactively.
    Browse {
        /// Zip code to start with.
        #[arg(long)]
        zip_code: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { zip_code, extra } => show(zip_code, extra).await,
            Command::Browse { zip_code } => browse(zip_code).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn open_session(zip_code: Option<String>) -> anyhow::Result<Session> {
    let config = Config::load()?;
    let route = zip_code.map(Route::with_zip_code).unwrap_or_default();
    let resolver = Resolver::http(config.endpoints());

    Ok(Session::new(&config, resolver, route))
}

async fn show(zip_code: Option<String>, extra: bool) -> anyhow::Result<()> {
    let mut session = open_session(zip_code)?;
    if extra {
        session.controller.toggle_extra_info();
    }

    session.fetch().await;
    print!("{}", render_screen(&session.screen(false)));
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    ToggleExtraInfo { visible: bool },
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("Search zip code"),
            Action::ToggleExtraInfo { visible: true } => f.write_str("Hide extra info"),
            Action::ToggleExtraInfo { visible: false } => f.write_str("Show extra info"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn actions(session: &Session) -> Vec<Action> {
    if session.has_failed() {
        vec![Action::Search, Action::Quit]
    } else {
        vec![
            Action::Search,
            Action::ToggleExtraInfo {
                visible: session.controller.extra_info_visible(),
            },
            Action::Quit,
        ]
    }
}

async fn browse(zip_code: Option<String>) -> anyhow::Result<()> {
    let mut session = open_session(zip_code)?;
    load(&mut session).await;

    loop {
        print!("{}", render_screen(&session.screen(false)));

        let action = match Select::new("What next?", actions(&session)).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read action"),
        };

        match action {
            Action::Search => {
                let draft = match Text::new("Zip code:")
                    .with_initial_value(session.controller.draft_zip_code())
                    .prompt()
                {
                    Ok(draft) => draft,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(e) => return Err(e).context("Failed to read zip code"),
                };

                session.controller.set_draft_zip_code(draft);
                let navigation = session.controller.on_submit();
                session.navigate(&navigation);
                load(&mut session).await;
            }
            Action::ToggleExtraInfo { .. } => session.controller.toggle_extra_info(),
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn load(session: &mut Session) {
    print!("{}", render_screen(&session.screen(true)));
    session.fetch().await;
}
