use super::catalog::Choice;
use crate::locale::{self, Locale};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Bot,
    User,
}

/// One selectable option, label already localized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub id: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Options(Vec<OptionItem>),
}

/// Transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub body: Body,
}

impl Message {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            body: Body::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            body: Body::Text(text.into()),
        }
    }

    pub fn options(choices: &[Choice], locale: Locale) -> Self {
        let items = choices
            .iter()
            .map(|c| OptionItem {
                id: c.id(),
                label: locale::resolve(c.label(), locale).to_string(),
            })
            .collect();
        Self {
            sender: Sender::Bot,
            body: Body::Options(items),
        }
    }

    pub fn option_items(&self) -> Option<&[OptionItem]> {
        match &self.body {
            Body::Options(items) => Some(items),
            Body::Text(_) => None,
        }
    }
}
