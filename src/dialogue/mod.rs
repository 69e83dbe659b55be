//! Scripted symptom-triage conversation.
//!
//! A [`Session`] is a plain value: every operation consumes it and hands back
//! the next state, so the whole conversation can be driven and inspected
//! without a terminal. Nothing here fails; unknown or out-of-place input is
//! either ignored or answered with a fallback message.

pub mod catalog;
pub mod message;
pub mod timer;

use std::mem;

pub use catalog::{Advice, Choice, Severity, Symptom, Topic};
pub use message::{Body, Message, OptionItem, Sender};
pub use timer::{ResetTimer, ResetToken};

use crate::locale::{self, Key, Locale};

/// Where the conversation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Main,
    Topic(Topic),
    /// Interview in progress. Belongs to the Symptoms topic.
    Flow(Symptom),
}

/// A finished symptom interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub symptom: Symptom,
    pub answers: Vec<String>,
    pub advice: Advice,
}

#[derive(Debug, Clone)]
pub struct Session {
    locale: Locale,
    stage: Stage,
    answers: Vec<String>,
    transcript: Vec<Message>,
    outcomes: Vec<Outcome>,
    pending_reset: Option<ResetToken>,
    next_token: u64,
}

impl Session {
    /// Greeting followed by the main menu
    pub fn open(locale: Locale) -> Self {
        let mut session = Self {
            locale,
            stage: Stage::Main,
            answers: Vec::new(),
            transcript: Vec::new(),
            outcomes: Vec::new(),
            pending_reset: None,
            next_token: 0,
        };
        session.say(Key::ChatbotHello);
        session.push(Message::options(&Choice::main_menu(), locale));
        tracing::debug!(locale = %locale, "Session opened");
        session
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Completed interviews, oldest first
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn active_flow(&self) -> Option<Symptom> {
        match self.stage {
            Stage::Flow(symptom) => Some(symptom),
            _ => None,
        }
    }

    /// Index of the next unanswered question of the active flow
    pub fn question_index(&self) -> usize {
        self.answers.len()
    }

    pub fn pending_reset(&self) -> Option<ResetToken> {
        self.pending_reset
    }

    /// Options of the most recent options message
    pub fn latest_options(&self) -> Option<&[OptionItem]> {
        self.transcript.iter().rev().find_map(Message::option_items)
    }

    /// Handle a tap on an option. Ids that are unknown or not offered at the
    /// current stage leave the session untouched.
    pub fn select_option(mut self, id: &str) -> Self {
        let Some(choice) = Choice::from_id(id) else {
            tracing::debug!(option = id, "Ignoring unknown option");
            return self;
        };

        match (self.stage, choice) {
            (Stage::Main, Choice::Topic(topic)) => {
                self.begin_action(choice);
                self.stage = Stage::Topic(topic);
                self.say(topic.prompt());
                self.push(Message::options(&topic.options(), self.locale));
            }
            (Stage::Topic(Topic::Symptoms) | Stage::Flow(_), Choice::Symptom(symptom)) => {
                self.begin_action(choice);
                self.stage = Stage::Flow(symptom);
                self.answers.clear();
                self.say(symptom.questions()[0]);
            }
            (Stage::Topic(topic), Choice::Reply(reply)) if reply.topic() == topic => {
                self.begin_action(choice);
                let text = locale::lookup(reply.reply(), self.locale)
                    .unwrap_or_else(|| locale::resolve(Key::ThankYouResponse, self.locale));
                self.push(Message::bot(text));
                self.schedule_reset();
            }
            (stage, _) => {
                tracing::debug!(option = id, ?stage, "Option not offered at this stage");
            }
        }
        self
    }

    /// Handle typed text. Outside an interview the text is only echoed.
    pub fn submit_text(mut self, text: &str) -> Self {
        self.push(Message::user(text));

        let Stage::Flow(symptom) = self.stage else {
            return self;
        };

        self.answers.push(text.to_lowercase());
        let questions = symptom.questions();
        if self.answers.len() < questions.len() {
            self.say(questions[self.answers.len()]);
            return self;
        }

        let advice = symptom.advise(&self.answers);
        self.say(advice.key());
        tracing::info!(
            symptom = symptom.id(),
            severity = ?advice.severity(),
            "Triage completed"
        );
        self.outcomes.push(Outcome {
            symptom,
            answers: mem::take(&mut self.answers),
            advice,
        });
        self.stage = Stage::Topic(Topic::Symptoms);
        self.schedule_reset();
        self
    }

    /// Back to the main menu once the reset delay has passed. A token that
    /// was superseded by a newer selection is ignored.
    pub fn return_to_main(mut self, token: ResetToken) -> Self {
        if self.pending_reset != Some(token) {
            tracing::debug!(?token, "Dropping stale reset");
            return self;
        }
        self.pending_reset = None;
        self.stage = Stage::Main;
        self.answers.clear();
        self.say(Key::HowElseHelp);
        self.push(Message::options(&Choice::main_menu(), self.locale));
        self
    }

    fn begin_action(&mut self, choice: Choice) {
        if let Some(token) = self.pending_reset.take() {
            tracing::debug!(?token, "Reset cancelled by new selection");
        }
        let label = locale::resolve(choice.label(), self.locale);
        self.push(Message::user(label));
    }

    fn schedule_reset(&mut self) {
        self.next_token += 1;
        self.pending_reset = Some(ResetToken(self.next_token));
    }

    fn say(&mut self, key: Key) {
        let text = locale::resolve(key, self.locale);
        self.push(Message::bot(text));
    }

    fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }
}
