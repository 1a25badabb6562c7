//! Batch parsing: raw task texts in, structured tasks out.

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, warn};

use crate::deadline::DeadlineExtractor;
use crate::difficulty::extract_difficulty;
use crate::duration::DurationExtractor;
use crate::error::Result;
use crate::importance::calculate_importance;
use crate::task::{ParsedTask, TaskStatus};
use crate::title::TitleNormalizer;

/// Compiled extractors, shareable across threads and reusable across batches.
#[derive(Debug, Clone)]
pub struct TaskParser {
    duration: DurationExtractor,
    deadline: DeadlineExtractor,
    title: TitleNormalizer,
}

impl TaskParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            duration: DurationExtractor::new()?,
            deadline: DeadlineExtractor::new()?,
            title: TitleNormalizer::new()?,
        })
    }

    /// Parse one raw text. Each field comes from its own extractor run.
    pub fn parse_task(&self, text: &str, now: NaiveDateTime) -> Result<ParsedTask> {
        let due_date = self.deadline.extract(text, now)?;
        let difficulty = extract_difficulty(text);

        Ok(ParsedTask {
            title: self.title.normalize(text)?,
            difficulty,
            estimated_hours: self.duration.extract(text),
            due_date,
            status: TaskStatus::Todo,
            priority: difficulty.priority(),
            progress: 0,
            importance: calculate_importance(due_date, difficulty, now),
        })
    }

    /// Parse a batch. Entries that are not non-blank strings are skipped, and an
    /// entry that fails to parse is logged and dropped; neither aborts the batch.
    pub fn process_tasks(&self, raw: &[Value], now: NaiveDateTime) -> Vec<ParsedTask> {
        let mut parsed = Vec::with_capacity(raw.len());

        for (index, entry) in raw.iter().enumerate() {
            let Some(text) = entry.as_str().filter(|s| !s.trim().is_empty()) else {
                debug!(index, "skipping blank or non-string task entry");
                continue;
            };

            match self.parse_task(text, now) {
                Ok(task) => parsed.push(task),
                Err(err) => warn!(index, text, error = %err, "failed to parse task"),
            }
        }

        parsed
    }
}
