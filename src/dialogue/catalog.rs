use serde::{Deserialize, Serialize};

use crate::locale::Key;

/// Top-level category picked from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Symptoms,
    Medicine,
    Routine,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Symptoms, Topic::Medicine, Topic::Routine];

    pub fn id(self) -> &'static str {
        match self {
            Topic::Symptoms => "symptoms",
            Topic::Medicine => "medicine",
            Topic::Routine => "routine",
        }
    }

    pub fn label(self) -> Key {
        match self {
            Topic::Symptoms => Key::Symptoms,
            Topic::Medicine => Key::Medicine,
            Topic::Routine => Key::Routine,
        }
    }

    pub fn prompt(self) -> Key {
        match self {
            Topic::Symptoms => Key::SelectSymptomPrompt,
            Topic::Medicine => Key::MedicineHelpPrompt,
            Topic::Routine => Key::RoutineHelpPrompt,
        }
    }

    /// Choices shown once this topic is selected
    pub fn options(self) -> Vec<Choice> {
        match self {
            Topic::Symptoms => Symptom::ALL.into_iter().map(Choice::Symptom).collect(),
            Topic::Medicine => vec![
                Choice::Reply(StaticReply::Refill),
                Choice::Reply(StaticReply::SideEffects),
            ],
            Topic::Routine => vec![
                Choice::Reply(StaticReply::Diet),
                Choice::Reply(StaticReply::Exercise),
                Choice::Reply(StaticReply::Sleep),
            ],
        }
    }
}

/// A symptom with a scripted two-question interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Fever,
    Headache,
    Stomach,
}

impl Symptom {
    pub const ALL: [Symptom; 3] = [Symptom::Fever, Symptom::Headache, Symptom::Stomach];

    pub fn id(self) -> &'static str {
        match self {
            Symptom::Fever => "fever",
            Symptom::Headache => "headache",
            Symptom::Stomach => "stomach",
        }
    }

    pub fn label(self) -> Key {
        match self {
            Symptom::Fever => Key::Fever,
            Symptom::Headache => Key::Headache,
            Symptom::Stomach => Key::StomachPain,
        }
    }

    pub fn questions(self) -> &'static [Key] {
        match self {
            Symptom::Fever => &[Key::FeverQ1, Key::FeverQ2],
            Symptom::Headache => &[Key::HeadacheQ1, Key::HeadacheQ2],
            Symptom::Stomach => &[Key::StomachQ1, Key::StomachQ2],
        }
    }

    /// Map the collected answers onto a piece of advice.
    ///
    /// Fever is severe when it has lasted more than three days or the second
    /// answer is "high". Headache and stomach pain are severe when the second
    /// answer is "yes". Missing answers count as non-matching.
    pub fn advise(self, answers: &[String]) -> Advice {
        let second = answers.get(1).map(String::as_str).unwrap_or("");
        match self {
            Symptom::Fever => {
                let days = answers.first().and_then(|a| leading_int(a));
                if days.is_some_and(|d| d > 3) || second.eq_ignore_ascii_case("high") {
                    Advice::FeverSevere
                } else {
                    Advice::FeverMild
                }
            }
            Symptom::Headache => {
                if second.eq_ignore_ascii_case("yes") {
                    Advice::HeadacheSevere
                } else {
                    Advice::HeadacheNormal
                }
            }
            Symptom::Stomach => {
                if second.eq_ignore_ascii_case("yes") {
                    Advice::StomachSevere
                } else {
                    Advice::StomachNormal
                }
            }
        }
    }
}

/// Integer prefix of `s`: leading whitespace, an optional sign, then digits.
/// "5 days" is 5, "3.9" is 3, "about 5" has none.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    // Saturate absurdly long day counts instead of failing the parse.
    let value = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Canned answers under the Medicine and Routine topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticReply {
    Refill,
    SideEffects,
    Diet,
    Exercise,
    Sleep,
}

impl StaticReply {
    pub const ALL: [StaticReply; 5] = [
        StaticReply::Refill,
        StaticReply::SideEffects,
        StaticReply::Diet,
        StaticReply::Exercise,
        StaticReply::Sleep,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StaticReply::Refill => "refill",
            StaticReply::SideEffects => "side",
            StaticReply::Diet => "diet",
            StaticReply::Exercise => "exercise",
            StaticReply::Sleep => "sleep",
        }
    }

    pub fn label(self) -> Key {
        match self {
            StaticReply::Refill => Key::PrescriptionRefill,
            StaticReply::SideEffects => Key::SideEffects,
            StaticReply::Diet => Key::Diet,
            StaticReply::Exercise => Key::Exercise,
            StaticReply::Sleep => Key::Sleep,
        }
    }

    pub fn reply(self) -> Key {
        match self {
            StaticReply::Refill => Key::RefillReply,
            StaticReply::SideEffects => Key::SideEffectsReply,
            StaticReply::Diet => Key::DietReply,
            StaticReply::Exercise => Key::ExerciseReply,
            StaticReply::Sleep => Key::SleepReply,
        }
    }

    pub fn topic(self) -> Topic {
        match self {
            StaticReply::Refill | StaticReply::SideEffects => Topic::Medicine,
            StaticReply::Diet | StaticReply::Exercise | StaticReply::Sleep => Topic::Routine,
        }
    }
}

/// Anything that can appear as a selectable option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Topic(Topic),
    Symptom(Symptom),
    Reply(StaticReply),
}

impl Choice {
    pub fn id(self) -> &'static str {
        match self {
            Choice::Topic(t) => t.id(),
            Choice::Symptom(s) => s.id(),
            Choice::Reply(r) => r.id(),
        }
    }

    pub fn label(self) -> Key {
        match self {
            Choice::Topic(t) => t.label(),
            Choice::Symptom(s) => s.label(),
            Choice::Reply(r) => r.label(),
        }
    }

    /// Resolve an option id against the fixed catalog
    pub fn from_id(id: &str) -> Option<Choice> {
        Topic::ALL
            .into_iter()
            .map(Choice::Topic)
            .chain(Symptom::ALL.into_iter().map(Choice::Symptom))
            .chain(StaticReply::ALL.into_iter().map(Choice::Reply))
            .find(|c| c.id() == id)
    }

    pub fn main_menu() -> Vec<Choice> {
        Topic::ALL.into_iter().map(Choice::Topic).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Severe,
    Mild,
}

/// Final advice produced by a symptom flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    FeverSevere,
    FeverMild,
    HeadacheSevere,
    HeadacheNormal,
    StomachSevere,
    StomachNormal,
}

impl Advice {
    pub fn key(self) -> Key {
        match self {
            Advice::FeverSevere => Key::FeverAdviceSevere,
            Advice::FeverMild => Key::FeverAdviceMild,
            Advice::HeadacheSevere => Key::HeadacheAdviceSevere,
            Advice::HeadacheNormal => Key::HeadacheAdviceNormal,
            Advice::StomachSevere => Key::StomachAdviceSevere,
            Advice::StomachNormal => Key::StomachAdviceNormal,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Advice::FeverSevere | Advice::HeadacheSevere | Advice::StomachSevere => {
                Severity::Severe
            }
            Advice::FeverMild | Advice::HeadacheNormal | Advice::StomachNormal => Severity::Mild,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fever_long_duration_is_severe() {
        assert_eq!(Symptom::Fever.advise(&answers(&["5", "normal"])), Advice::FeverSevere);
    }

    #[test]
    fn fever_high_temperature_is_severe() {
        assert_eq!(Symptom::Fever.advise(&answers(&["2", "high"])), Advice::FeverSevere);
        assert_eq!(Symptom::Fever.advise(&answers(&["2", "HIGH"])), Advice::FeverSevere);
    }

    #[test]
    fn fever_short_and_normal_is_mild() {
        assert_eq!(Symptom::Fever.advise(&answers(&["2", "normal"])), Advice::FeverMild);
        assert_eq!(Symptom::Fever.advise(&answers(&["3", "normal"])), Advice::FeverMild);
    }

    #[test]
    fn fever_unparseable_days_uses_second_answer() {
        assert_eq!(Symptom::Fever.advise(&answers(&["a week", "normal"])), Advice::FeverMild);
        assert_eq!(Symptom::Fever.advise(&answers(&["a week", "high"])), Advice::FeverSevere);
    }

    #[test]
    fn fever_day_count_uses_integer_prefix() {
        assert_eq!(Symptom::Fever.advise(&answers(&["4 days", "normal"])), Advice::FeverSevere);
        assert_eq!(Symptom::Fever.advise(&answers(&["3.9", "normal"])), Advice::FeverMild);
    }

    #[test]
    fn headache_yes_is_severe() {
        assert_eq!(
            Symptom::Headache.advise(&answers(&["two hours", "Yes"])),
            Advice::HeadacheSevere
        );
        assert_eq!(
            Symptom::Headache.advise(&answers(&["two hours", "no"])),
            Advice::HeadacheNormal
        );
    }

    #[test]
    fn stomach_mirrors_headache() {
        assert_eq!(Symptom::Stomach.advise(&answers(&["left", "yes"])), Advice::StomachSevere);
        assert_eq!(Symptom::Stomach.advise(&answers(&["left", "maybe"])), Advice::StomachNormal);
    }

    #[test]
    fn leading_int_prefixes() {
        assert_eq!(leading_int("  12abc"), Some(12));
        assert_eq!(leading_int("-4"), Some(-4));
        assert_eq!(leading_int("+7"), Some(7));
        assert_eq!(leading_int("x7"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn every_flow_has_two_questions() {
        for s in Symptom::ALL {
            assert_eq!(s.questions().len(), 2);
        }
    }

    #[test]
    fn catalog_ids_are_unique_and_resolvable() {
        let mut ids: Vec<&str> = Topic::ALL.iter().map(|t| t.id()).collect();
        ids.extend(Symptom::ALL.iter().map(|s| s.id()));
        ids.extend(StaticReply::ALL.iter().map(|r| r.id()));
        for id in &ids {
            assert_eq!(Choice::from_id(id).map(Choice::id), Some(*id));
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
        assert_eq!(Choice::from_id("cough"), None);
    }

    #[test]
    fn topic_options_match_reply_topics() {
        for reply in StaticReply::ALL {
            assert!(reply.topic().options().contains(&Choice::Reply(reply)));
        }
        assert_eq!(
            Topic::Symptoms.options(),
            vec![
                Choice::Symptom(Symptom::Fever),
                Choice::Symptom(Symptom::Headache),
                Choice::Symptom(Symptom::Stomach),
            ]
        );
    }

    #[test]
    fn advice_severity() {
        assert_eq!(Advice::FeverSevere.severity(), Severity::Severe);
        assert_eq!(Advice::StomachNormal.severity(), Severity::Mild);
    }
}
