//! Criteria encoding: task fields -> three real-valued criteria.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::task::{Difficulty, Priority, Task};
use crate::time::deadline_instant;

/// Number of ranking criteria. The engine does not generalize beyond these.
pub const CRITERIA_COUNT: usize = 3;

/// Criterion names in column order.
pub const CRITERIA_NAMES: [&str; CRITERIA_COUNT] = ["priority", "difficulty", "deadline"];

/// Raw (un-normalized) criteria of one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriterionVector {
    pub priority: f64,
    pub difficulty: f64,
    /// Hours until the deadline; zero once it has passed.
    pub hours_left: f64,
}

impl CriterionVector {
    pub fn as_array(&self) -> [f64; CRITERIA_COUNT] {
        [self.priority, self.difficulty, self.hours_left]
    }
}

pub fn encode_priority(p: Priority) -> f64 {
    match p {
        Priority::Low => 1.0,
        Priority::High => 2.0,
    }
}

pub fn encode_difficulty(d: Difficulty) -> f64 {
    match d {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 3.0,
        Difficulty::Hard => 5.0,
    }
}

/// Hours from `now` until midnight of `deadline`, floored at zero.
pub fn hours_left(deadline: NaiveDate, now: NaiveDateTime) -> f64 {
    let millis = (deadline_instant(deadline) - now).num_milliseconds();
    (millis as f64 / 3_600_000.0).max(0.0)
}

pub fn encode(task: &Task, now: NaiveDateTime) -> CriterionVector {
    CriterionVector {
        priority: encode_priority(task.priority),
        difficulty: encode_difficulty(task.difficulty),
        hours_left: hours_left(task.deadline, now),
    }
}
