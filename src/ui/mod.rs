use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::dialogue::{Body, Choice, Message, Sender, Session, Stage};
use crate::history::HistoryEntry;
use crate::locale::{self, Key, Locale, LocaleError};

/// What a line typed at the prompt means
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Empty,
    Quit,
    Restart,
    Help,
    Language(Result<Locale, LocaleError>),
    Select(&'static str),
    Text(String),
}

/// Interpret a typed line against the current session.
///
/// During an interview every non-command line is an answer and is passed on
/// as typed, minus the line ending. Otherwise a number picks from the latest
/// options, an option id or label selects it, and anything else is plain text.
pub fn interpret(session: &Session, raw: &str) -> Input {
    let raw = raw.trim_end_matches(['\r', '\n']);
    let line = raw.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    if let Some(command) = line.strip_prefix('/') {
        let mut parts = command.split_whitespace();
        return match parts.next().unwrap_or("") {
            "quit" | "exit" | "q" => Input::Quit,
            "restart" => Input::Restart,
            "lang" => Input::Language(parts.next().unwrap_or("").parse()),
            _ => Input::Help,
        };
    }

    if session.active_flow().is_some() {
        return Input::Text(raw.to_string());
    }

    let options = session.latest_options().unwrap_or(&[]);
    if let Ok(n) = line.parse::<usize>() {
        if let Some(item) = n.checked_sub(1).and_then(|i| options.get(i)) {
            return Input::Select(item.id);
        }
    }

    let lowered = line.to_lowercase();
    if let Some(choice) = Choice::from_id(&lowered) {
        return Input::Select(choice.id());
    }
    if let Some(item) = options.iter().find(|o| o.label.to_lowercase() == lowered) {
        return Input::Select(item.id);
    }

    Input::Text(line.to_string())
}

/// Terminal lines for one transcript entry
pub fn format_message(message: &Message) -> Vec<String> {
    match (&message.sender, &message.body) {
        (Sender::Bot, Body::Text(text)) => vec![format!("  + {}", text)],
        (Sender::User, Body::Text(text)) => vec![format!("  > {}", text)],
        (_, Body::Options(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("      [{}] {}", i + 1, item.label))
            .collect(),
    }
}

/// Print transcript entries added since `shown`; returns the new count.
///
/// The spinner is cleared before anything is printed so its line is not
/// overwritten mid-message.
pub fn render_new(session: &Session, shown: usize, typing: &mut TypingIndicator) -> usize {
    let transcript = session.transcript();
    if transcript.len() > shown {
        typing.set(false);
    }
    for message in transcript.iter().skip(shown) {
        for line in format_message(message) {
            println!("{}", line);
        }
    }
    transcript.len()
}

/// Prompt for the next line
pub fn display_prompt(session: &Session) {
    print!("{} ", prompt_text(session));
    if let Err(e) = io::stdout().flush() {
        tracing::debug!(error = %e, "Failed to flush prompt");
    }
}

pub fn prompt_text(session: &Session) -> String {
    match session.stage() {
        Stage::Flow(symptom) => format!(
            "[{}/{}] {}",
            session.question_index() + 1,
            symptom.questions().len(),
            locale::resolve(Key::TypeYourAnswer, session.locale())
        ),
        Stage::Main | Stage::Topic(_) => "Choose an option:".to_string(),
    }
}

pub fn locale_name(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "English",
        Locale::Hindi => "Hindi",
        Locale::Bengali => "Bengali",
        Locale::Telugu => "Telugu",
        Locale::Marathi => "Marathi",
        Locale::Tamil => "Tamil",
    }
}

/// Display welcome message
pub fn display_welcome(locale: Locale) {
    println!();
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                          Suvidha                              ║");
    println!("║                  {:<45}║", locale::resolve(Key::ChatbotTitle, locale));
    println!("╠═══════════════════════════════════════════════════════════════╣");
    println!("║  Answer a few questions about how you feel and get simple     ║");
    println!("║  guidance on what to do next.                                 ║");
    println!("║                                                               ║");
    println!("║          WARNING: This is NOT a diagnosis tool.               ║");
    println!("║     Always consult a medical professional for proper          ║");
    println!("║     diagnosis and treatment.                                  ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("Language: {}   (type /help for commands)", locale_name(locale));
    println!();
}

pub fn display_help() {
    println!();
    println!("  Pick an option by its number or name, or type your answer.");
    println!("    /lang <code>   switch language (en, hi, bn, te, mr, ta)");
    println!("    /restart       start a new conversation");
    println!("    /quit          leave");
    println!();
}

/// Display when a new conversation starts in place of the old one
pub fn display_restart(locale: Locale) {
    println!("\n─────────────── {} ───────────────\n", locale_name(locale));
}

pub fn display_goodbye() {
    println!("\nGoodbye! Take care!");
}

pub fn format_history_entry(entry: &HistoryEntry) -> String {
    format!(
        "{}  {:<14} {:<7} {}\n    answers: {}\n    id: {}",
        entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        entry.title,
        format!("{:?}", entry.details.severity).to_lowercase(),
        entry.subtitle,
        entry.details.answers.join(" / "),
        entry.id,
    )
}

pub fn display_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No history yet.");
        return;
    }
    println!("═══════════════════════════════════════════════════════════════");
    println!("                      TRIAGE HISTORY");
    println!("═══════════════════════════════════════════════════════════════");
    for entry in entries {
        println!("{}\n", format_history_entry(entry));
    }
}

/// Spinner shown while the assistant is about to return to the menu
#[derive(Default)]
pub struct TypingIndicator {
    bar: Option<ProgressBar>,
}

impl TypingIndicator {
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    pub fn set(&mut self, visible: bool) {
        match (visible, self.bar.is_some()) {
            (true, false) => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("  {spinner:.green} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.set_message("...");
                bar.enable_steady_tick(Duration::from_millis(120));
                self.bar = Some(bar);
            }
            (false, true) => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
            _ => {}
        }
    }
}
