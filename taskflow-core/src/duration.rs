//! Effort estimate: "about 2.5 hours", "~3h", "for 2 hrs".

use regex::Regex;

use crate::error::Result;

pub const DEFAULT_HOURS: f64 = 1.0;

const DURATION_PATTERN: &str = r"(?i)(~|about|approximately|for)? ?(\d+(\.\d+)?) ?(hours|hrs|h)";

#[derive(Debug, Clone)]
pub struct DurationExtractor {
    re: Regex,
}

impl DurationExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            re: Regex::new(DURATION_PATTERN)?,
        })
    }

    /// First hour quantity in the text, or [`DEFAULT_HOURS`].
    ///
    /// A zero quantity also yields the default; estimates are always positive.
    pub fn extract(&self, text: &str) -> f64 {
        self.re
            .captures(text)
            .and_then(|caps| caps.get(2))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|hours| *hours > 0.0)
            .unwrap_or(DEFAULT_HOURS)
    }
}
