//! taskflow-core: free-text task parsing and due-date day scheduling.

pub mod deadline;
pub mod difficulty;
pub mod duration;
pub mod error;
pub mod importance;
pub mod pipeline;
pub mod scheduler;
pub mod scoring;
pub mod task;
pub mod time;
pub mod title;

pub use deadline::DeadlineExtractor;
pub use difficulty::extract_difficulty;
pub use duration::DurationExtractor;
pub use error::{Result, TaskflowError};
pub use importance::{calculate_importance, importance_level};
pub use pipeline::TaskParser;
pub use scheduler::{
    DailyScheduler, Schedule, ScheduleEntry, ScheduleOutput, SchedulerConfig, ScoredTask,
    UnscheduledTask, pending_by_due_date,
};
pub use scoring::score_task;
pub use task::{
    Difficulty, Importance, ParsedTask, Priority, SchedulableTask, TaskId, TaskStatus,
};
pub use title::TitleNormalizer;
