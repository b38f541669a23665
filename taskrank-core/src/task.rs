//! Task snapshot model consumed by the ranking engine.
//!
//! Storage and completion bookkeeping live outside this crate; the engine only
//! ever sees already-resolved, read-only records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RankError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::High => "High",
        }
    }
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Priority {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "high" => Ok(Priority::High),
            _ => Err(RankError::criterion("priority", s)),
        }
    }
}

impl FromStr for Difficulty {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(RankError::criterion("difficulty", s)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A pending work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "task_name")]
    pub name: String,
    pub subject: Option<String>,

    pub priority: Priority,
    pub difficulty: Difficulty,

    /// Calendar date; the task is due at 00:00 of this day.
    pub deadline: NaiveDate,

    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        priority: Priority,
        difficulty: Difficulty,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject: None,
            priority,
            difficulty,
            deadline,
            is_completed: false,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }
}
