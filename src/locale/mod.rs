use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

/// Languages offered by the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    English,
    Hindi,
    Bengali,
    Telugu,
    Marathi,
    Tamil,
}

impl Locale {
    pub const ALL: [Locale; 6] = [
        Locale::English,
        Locale::Hindi,
        Locale::Bengali,
        Locale::Telugu,
        Locale::Marathi,
        Locale::Tamil,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Hindi => "hi",
            Locale::Bengali => "bn",
            Locale::Telugu => "te",
            Locale::Marathi => "mr",
            Locale::Tamil => "ta",
        }
    }

    fn table_source(self) -> &'static str {
        match self {
            Locale::English => include_str!("../../locales/en.json"),
            Locale::Hindi => include_str!("../../locales/hi.json"),
            Locale::Bengali => include_str!("../../locales/bn.json"),
            Locale::Telugu => include_str!("../../locales/te.json"),
            Locale::Marathi => include_str!("../../locales/mr.json"),
            Locale::Tamil => include_str!("../../locales/ta.json"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Unknown language code: {0}. Supported: en, hi, bn, te, mr, ta.")]
    Unknown(String),
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Locale::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| LocaleError::Unknown(s.to_string()))
    }
}

/// Every message key the assistant reads from the translation tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ChatbotTitle,
    ChatbotHello,
    HowElseHelp,
    TypeYourAnswer,
    ThankYouResponse,
    Symptoms,
    Medicine,
    Routine,
    Fever,
    Headache,
    StomachPain,
    PrescriptionRefill,
    SideEffects,
    Diet,
    Exercise,
    Sleep,
    SelectSymptomPrompt,
    MedicineHelpPrompt,
    RoutineHelpPrompt,
    RefillReply,
    SideEffectsReply,
    DietReply,
    ExerciseReply,
    SleepReply,
    FeverQ1,
    FeverQ2,
    FeverAdviceSevere,
    FeverAdviceMild,
    HeadacheQ1,
    HeadacheQ2,
    HeadacheAdviceSevere,
    HeadacheAdviceNormal,
    StomachQ1,
    StomachQ2,
    StomachAdviceSevere,
    StomachAdviceNormal,
}

impl Key {
    pub const ALL: [Key; 36] = [
        Key::ChatbotTitle,
        Key::ChatbotHello,
        Key::HowElseHelp,
        Key::TypeYourAnswer,
        Key::ThankYouResponse,
        Key::Symptoms,
        Key::Medicine,
        Key::Routine,
        Key::Fever,
        Key::Headache,
        Key::StomachPain,
        Key::PrescriptionRefill,
        Key::SideEffects,
        Key::Diet,
        Key::Exercise,
        Key::Sleep,
        Key::SelectSymptomPrompt,
        Key::MedicineHelpPrompt,
        Key::RoutineHelpPrompt,
        Key::RefillReply,
        Key::SideEffectsReply,
        Key::DietReply,
        Key::ExerciseReply,
        Key::SleepReply,
        Key::FeverQ1,
        Key::FeverQ2,
        Key::FeverAdviceSevere,
        Key::FeverAdviceMild,
        Key::HeadacheQ1,
        Key::HeadacheQ2,
        Key::HeadacheAdviceSevere,
        Key::HeadacheAdviceNormal,
        Key::StomachQ1,
        Key::StomachQ2,
        Key::StomachAdviceSevere,
        Key::StomachAdviceNormal,
    ];

    /// Name of the key inside the JSON tables
    pub fn as_str(self) -> &'static str {
        match self {
            Key::ChatbotTitle => "chatbot_title",
            Key::ChatbotHello => "chatbot_hello",
            Key::HowElseHelp => "how_else_help",
            Key::TypeYourAnswer => "type_your_answer",
            Key::ThankYouResponse => "thank_you_response",
            Key::Symptoms => "symptoms",
            Key::Medicine => "medicine",
            Key::Routine => "routine",
            Key::Fever => "fever",
            Key::Headache => "headache",
            Key::StomachPain => "stomach_pain",
            Key::PrescriptionRefill => "prescription_refill",
            Key::SideEffects => "side_effects",
            Key::Diet => "diet",
            Key::Exercise => "exercise",
            Key::Sleep => "sleep",
            Key::SelectSymptomPrompt => "select_symptom_prompt",
            Key::MedicineHelpPrompt => "medicine_help_prompt",
            Key::RoutineHelpPrompt => "routine_help_prompt",
            Key::RefillReply => "refill_reply",
            Key::SideEffectsReply => "side_effects_reply",
            Key::DietReply => "diet_reply",
            Key::ExerciseReply => "exercise_reply",
            Key::SleepReply => "sleep_reply",
            Key::FeverQ1 => "fever_q1",
            Key::FeverQ2 => "fever_q2",
            Key::FeverAdviceSevere => "fever_advice_severe",
            Key::FeverAdviceMild => "fever_advice_mild",
            Key::HeadacheQ1 => "headache_q1",
            Key::HeadacheQ2 => "headache_q2",
            Key::HeadacheAdviceSevere => "headache_advice_severe",
            Key::HeadacheAdviceNormal => "headache_advice_normal",
            Key::StomachQ1 => "stomach_q1",
            Key::StomachQ2 => "stomach_q2",
            Key::StomachAdviceSevere => "stomach_advice_severe",
            Key::StomachAdviceNormal => "stomach_advice_normal",
        }
    }
}

/// Flat key -> string tables for every supported locale
pub struct Translations {
    tables: HashMap<Locale, HashMap<String, String>>,
}

impl Translations {
    /// Parse the embedded tables. A table that fails to parse is logged and
    /// left empty so lookups fall through to English.
    pub fn load() -> Self {
        let mut tables = HashMap::new();
        for locale in Locale::ALL {
            let table = parse_table(locale.table_source()).unwrap_or_else(|e| {
                tracing::warn!(locale = %locale, error = %e, "Translation table is unreadable");
                HashMap::new()
            });
            tables.insert(locale, table);
        }
        Self { tables }
    }

    fn get(&self, key: Key, locale: Locale) -> Option<&str> {
        self.tables
            .get(&locale)
            .and_then(|t| t.get(key.as_str()))
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Localized string, falling back to English. `None` when neither table has it.
    pub fn lookup(&self, key: Key, locale: Locale) -> Option<&str> {
        self.get(key, locale).or_else(|| self.get(key, Locale::English))
    }

    /// Localized string that is never empty: locale, then English, then the key name.
    pub fn resolve(&self, key: Key, locale: Locale) -> &str {
        self.lookup(key, locale).unwrap_or_else(|| key.as_str())
    }

    /// Keys the given locale does not translate itself
    pub fn missing_keys(&self, locale: Locale) -> Vec<Key> {
        Key::ALL
            .into_iter()
            .filter(|k| self.get(*k, locale).is_none())
            .collect()
    }
}

fn parse_table(source: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    serde_json::from_str(source)
}

static TRANSLATIONS: OnceLock<Translations> = OnceLock::new();

/// Process-wide translation tables, parsed on first use
pub fn translations() -> &'static Translations {
    TRANSLATIONS.get_or_init(Translations::load)
}

pub fn resolve(key: Key, locale: Locale) -> &'static str {
    translations().resolve(key, locale)
}

pub fn lookup(key: Key, locale: Locale) -> Option<&'static str> {
    translations().lookup(key, locale)
}
