mod config;
mod dialogue;
mod history;
mod locale;
mod preferences;
mod ui;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use config::{Config, APP_NAME, APP_VERSION, DEFAULT_RESET_DELAY_MS};
use dialogue::{ResetTimer, Session};
use history::{History, NewEntry};
use locale::Locale;
use preferences::PreferenceStore;
use ui::Input;

#[derive(Parser)]
#[command(author, version, about = "Multilingual symptom-triage assistant")]
struct Cli {
    #[command(flatten)]
    chat: ChatArgs,

    /// Location of the triage history log
    #[arg(long, global = true, env = "SUVIDHA_HISTORY")]
    history_file: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct ChatArgs {
    /// Conversation language (en, hi, bn, te, mr, ta); defaults to the last one chosen
    #[arg(long, env = "SUVIDHA_LANG")]
    lang: Option<Locale>,

    /// Milliseconds before returning to the main menu after an answer
    #[arg(long, default_value_t = DEFAULT_RESET_DELAY_MS)]
    reset_delay_ms: u64,

    /// Do not record completed triage in the history log
    #[arg(long, default_value_t = false)]
    no_history: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show or edit the triage history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum HistoryAction {
    /// List entries, newest first
    List,
    /// Delete one entry
    Remove { id: String },
    /// Delete every entry
    Clear,
}

fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_history(history: &History, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List => ui::display_history(&history.list()),
        HistoryAction::Remove { id } => {
            let remaining = history.remove(&id)?;
            println!("Removed {}. {} entries left.", id, remaining.len());
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("History cleared ({}).", history.path().display());
        }
    }
    Ok(())
}

/// Language for a new chat: `--lang`, then the saved preference, then English
fn starting_locale(requested: Option<Locale>, store: &PreferenceStore) -> Locale {
    requested.or_else(|| store.load().locale()).unwrap_or_default()
}

/// Write outcomes completed since `recorded` to the history log
fn record_outcomes(history: Option<&History>, session: &Session, recorded: usize) -> usize {
    let outcomes = session.outcomes();
    if let Some(history) = history {
        for outcome in outcomes.iter().skip(recorded) {
            let title = locale::resolve(outcome.symptom.label(), session.locale());
            let advice = locale::resolve(outcome.advice.key(), session.locale());
            if let Err(e) = history.add(NewEntry::triage(outcome, title, advice)) {
                tracing::warn!(error = %e, "Could not record triage outcome");
            }
        }
    }
    outcomes.len()
}

async fn chat(config: Config) -> Result<()> {
    let history = config.history_path.as_ref().map(History::new);
    let preferences = PreferenceStore::new(&config.preferences_path);
    let mut locale = config.locale;
    let mut session = Session::open(locale);
    let mut shown = 0;
    let mut recorded = 0;
    let mut timer = ResetTimer::new(config.reset_delay);
    let mut typing = ui::TypingIndicator::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::debug!(
        locale = %locale,
        untranslated = locale::translations().missing_keys(locale).len(),
        reset_delay_ms = timer.delay().as_millis() as u64,
        history = ?config.history_path,
        "Starting chat"
    );
    ui::display_welcome(locale);

    loop {
        shown = ui::render_new(&session, shown, &mut typing);
        recorded = record_outcomes(history.as_ref(), &session, recorded);
        timer.sync(session.pending_reset());
        typing.set(timer.is_armed());
        if !timer.is_armed() {
            ui::display_prompt(&session);
        }

        tokio::select! {
            token = timer.expired() => {
                session = session.return_to_main(token);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                typing.set(false);
                match ui::interpret(&session, &line) {
                    Input::Empty => {}
                    Input::Quit => break,
                    Input::Help => ui::display_help(),
                    Input::Restart => {
                        ui::display_restart(locale);
                        session = Session::open(locale);
                        shown = 0;
                        recorded = 0;
                    }
                    Input::Language(Ok(next)) => {
                        locale = next;
                        if let Err(e) = preferences.set_language(locale) {
                            tracing::warn!(
                                path = %preferences.path().display(),
                                error = %e,
                                "Could not save preferred language"
                            );
                        }
                        ui::display_restart(locale);
                        session = Session::open(locale);
                        shown = 0;
                        recorded = 0;
                    }
                    Input::Language(Err(e)) => println!("  {}", e),
                    Input::Select(id) => session = session.select_option(id),
                    Input::Text(text) => session = session.submit_text(&text),
                }
            }
        }
    }

    typing.set(false);
    ui::display_goodbye();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("{} starting v{}", APP_NAME, APP_VERSION);

    let history_path = cli
        .history_file
        .unwrap_or_else(config::default_history_path);

    match cli.command {
        Some(Command::History { action }) => {
            run_history(&History::new(history_path), action.unwrap_or(HistoryAction::List))
        }
        None => {
            let preferences_path = config::preferences_path(&history_path);
            let config = Config {
                locale: starting_locale(cli.chat.lang, &PreferenceStore::new(&preferences_path)),
                reset_delay: Duration::from_millis(cli.chat.reset_delay_ms),
                history_path: (!cli.chat.no_history).then_some(history_path),
                preferences_path,
            };
            chat(config).await
        }
    }
}
