//! Display titles: strip effort, difficulty, and deadline phrases from the
//! raw text, then title-case what is left.
//!
//! The phrase lists here are searched on their own and do not consult what
//! the extractors picked, so the stripped phrase can differ from the one that
//! set the due date or difficulty.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

const ORDINAL_DAY: &str = r"\d{1,2}(?:st|nd|rd|th)?";
const WEEKDAYS: &str = concat!(
    "monday|tuesday|wednesday|thursday|friday|saturday|sunday|",
    "mon|tue|wed|thu|fri|sat|sun"
);

const STOPWORDS: [&str; 15] = [
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "of", "on", "or", "the", "to", "with",
];

#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    duration: Vec<Regex>,
    difficulty: Vec<Regex>,
    deadline: Vec<Regex>,
    /// "on math", "on homework": a subject, not a date.
    subject_guard: Regex,
    spaces: Regex,
    punctuation: Regex,
    edges: Regex,
}

impl TitleNormalizer {
    pub fn new() -> Result<Self> {
        let weekdays = WEEKDAYS;

        Ok(Self {
            duration: compile(&[
                r"(~|about|approximately|for|takes?)? ?\d+(\.\d+)? ?(hours|hrs|h|hour)".to_string(),
                r"should take \d+(\.\d+)? ?(hours|hrs|h|hour)".to_string(),
            ])?,
            difficulty: compile(&[
                r"(?:it'?s|this is|difficulty:?\s+)?\b(easy|medium|hard)\b(?:\s+difficulty)?"
                    .to_string(),
                r"\b(easy|medium|hard)\b\s+task".to_string(),
            ])?,
            deadline: compile(&[
                format!(r"due\s+(?:on\s+)?(?:\w+(?:\s+{ORDINAL_DAY})?|{ORDINAL_DAY}\s+\w+)"),
                format!(r"by\s+(?:\w+(?:\s+{ORDINAL_DAY})?|{ORDINAL_DAY}\s+\w+)"),
                r"in\s+\d+\s+(?:day|days|week|weeks|month|months)".to_string(),
                r"\b(?:tomorrow|tmr|tmrw)\b".to_string(),
                format!(r"\bnext\s+(?:week|month|{weekdays})\b"),
                r"\bthis\s+(?:week|month)\b".to_string(),
                format!(r"\bon\s+(?:\w+(?:\s+{ORDINAL_DAY})?|{ORDINAL_DAY}\s+\w+)"),
                format!(r"{ORDINAL_DAY}\s+(?:of\s+)?\w+"),
            ])?,
            subject_guard: Regex::new(r"(?i)\bon\s+(?:math|reading|homework|project|exam)")?,
            spaces: Regex::new(r"\s{2,}")?,
            punctuation: Regex::new(r"[,.]+(?:\s+[,.]+)*")?,
            edges: Regex::new(r"^\W+|\W+$")?,
        })
    }

    pub fn normalize(&self, text: &str) -> Result<String> {
        let mut clean = text.trim().to_string();

        let mut phrases: Vec<String> = Vec::new();
        for re in self.duration.iter().chain(&self.difficulty) {
            if let Some(m) = re.find(&clean) {
                phrases.push(m.as_str().to_string());
            }
        }
        for re in &self.deadline {
            if let Some(m) = re.find(&clean) {
                if !self.subject_guard.is_match(m.as_str()) {
                    phrases.push(m.as_str().to_string());
                }
            }
        }

        for phrase in phrases.iter().filter(|p| !p.is_empty()) {
            let literal = RegexBuilder::new(&regex::escape(phrase))
                .case_insensitive(true)
                .build()?;
            clean = literal.replace_all(&clean, "").into_owned();
        }

        let clean = self.spaces.replace_all(&clean, " ");
        let clean = self.punctuation.replace_all(&clean, "");
        let clean = self.edges.replace_all(&clean, "");

        Ok(title_case(clean.trim()))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    let compiled = patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(compiled)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && STOPWORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(&lower)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
