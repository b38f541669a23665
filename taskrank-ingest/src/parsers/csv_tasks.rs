//! Parse CSV task exports.
//!
//! Expected header (column order does not matter):
//!   id,task_name,subject,priority,difficulty,deadline,is_completed
//!
//! `subject` and `is_completed` may be empty or absent. Deadlines are YYYY-MM-DD.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use taskrank_core::{Difficulty, Priority, Task};

use crate::types::parse_flag;

#[derive(Debug, Deserialize)]
struct TaskRow {
    id: String,
    task_name: String,
    #[serde(default)]
    subject: Option<String>,
    priority: String,
    difficulty: String,
    deadline: String,
    #[serde(default)]
    is_completed: Option<String>,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        // Bad literals fail the whole load rather than dropping the row.
        let priority: Priority = self.priority.parse()?;
        let difficulty: Difficulty = self.difficulty.parse()?;
        let deadline = NaiveDate::parse_from_str(&self.deadline, "%Y-%m-%d")
            .with_context(|| format!("invalid deadline '{}' (use YYYY-MM-DD)", self.deadline))?;

        let flag = self.is_completed.unwrap_or_default();
        let is_completed =
            parse_flag(&flag).ok_or_else(|| anyhow!("invalid is_completed value '{flag}'"))?;

        let mut task = Task::new(self.id, self.task_name, priority, difficulty, deadline);
        task.subject = self.subject.filter(|s| !s.is_empty());
        task.is_completed = is_completed;
        Ok(task)
    }
}

/// Parse tasks from any CSV reader.
pub fn parse_tasks_csv<R: Read>(reader: R) -> Result<Vec<Task>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut tasks = Vec::new();
    for (i, result) in rdr.deserialize::<TaskRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = result.with_context(|| format!("reading CSV line {line}"))?;
        let task = row
            .into_task()
            .with_context(|| format!("CSV line {line}"))?;
        tasks.push(task);
    }

    Ok(tasks)
}

pub fn load_tasks_csv(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_tasks_csv(file).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::RankError;

    #[test]
    fn test_parse_basic_rows() {
        let csv = "\
id,task_name,subject,priority,difficulty,deadline,is_completed
1,Essay draft,Literature,High,Hard,2026-03-02,false
2, Problem set ,,low,easy,2026-03-09,
3,Old quiz,Math,Low,Medium,2026-01-10,true
";
        let tasks = parse_tasks_csv(csv.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].subject.as_deref(), Some("Literature"));
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[1].name, "Problem set");
        assert_eq!(tasks[1].subject, None);
        assert_eq!(tasks[1].difficulty, Difficulty::Easy);
        assert!(!tasks[1].is_completed);
        assert!(tasks[2].is_completed);
    }

    #[test]
    fn test_optional_columns_absent() {
        let csv = "id,task_name,priority,difficulty,deadline\n9,Read,High,Easy,2026-04-01\n";
        let tasks = parse_tasks_csv(csv.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].subject, None);
        assert!(!tasks[0].is_completed);
    }

    #[test]
    fn test_bad_priority_fails_fast() {
        let csv = "\
id,task_name,priority,difficulty,deadline
1,Fine,High,Easy,2026-03-02
2,Broken,Urgent,Easy,2026-03-02
";
        let err = parse_tasks_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
        let rank_err = err.downcast_ref::<RankError>().unwrap();
        assert_eq!(
            rank_err,
            &RankError::InvalidCriterionValue {
                field: "priority",
                value: "Urgent".to_string()
            }
        );
    }

    #[test]
    fn test_bad_deadline() {
        let csv = "id,task_name,priority,difficulty,deadline\n1,x,High,Easy,03/02/2026\n";
        let err = parse_tasks_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid deadline"));
    }
}
