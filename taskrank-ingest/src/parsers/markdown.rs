//! Markdown task list parser.
//!
//! Expected layout:
//!   ## Physics
//!   - [ ] Lab report | High | Hard | 2026-03-02
//!   - [x] Reading    | Low  | Easy | 2026-02-20
//!
//! `##` headings set the subject for the items below them. Ids are assigned
//! `md-0001`, `md-0002`, ... in file order. A checkbox line that does not have
//! exactly four `|`-separated fields fails the load; non-checkbox lines are ignored.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use taskrank_core::{Difficulty, Priority, Task};

pub fn parse_tasks_md(md: &str) -> Result<Vec<Task>> {
    let heading_re = Regex::new(r"^\s*##\s+(?P<subject>.+?)\s*$")?;
    let checkbox_re = Regex::new(r"^\s*[-*]\s+\[[ xX]\]")?;

    // - [ ] NAME | PRIORITY | DIFFICULTY | DEADLINE
    let item_re = Regex::new(concat!(
        r"^\s*[-*]\s+\[(?P<done>[ xX])\]\s+",
        r"(?P<name>[^|]+?)\s*\|\s*",
        r"(?P<priority>[^|]+?)\s*\|\s*",
        r"(?P<difficulty>[^|]+?)\s*\|\s*",
        r"(?P<deadline>[^|]+?)\s*$"
    ))?;

    let mut subject: Option<String> = None;
    let mut out = Vec::new();

    for (i, line) in md.lines().enumerate() {
        if let Some(caps) = heading_re.captures(line) {
            subject = Some(caps["subject"].to_string());
            continue;
        }

        let line_no = i + 1;
        let Some(caps) = item_re.captures(line) else {
            if checkbox_re.is_match(line) {
                bail!(
                    "markdown line {line_no}: expected `name | priority | difficulty | deadline`, got {:?}",
                    line.trim()
                );
            }
            continue;
        };

        let priority: Priority = caps["priority"]
            .parse()
            .with_context(|| format!("markdown line {line_no}"))?;
        let difficulty: Difficulty = caps["difficulty"]
            .parse()
            .with_context(|| format!("markdown line {line_no}"))?;
        let deadline = NaiveDate::parse_from_str(&caps["deadline"], "%Y-%m-%d")
            .with_context(|| {
                format!(
                    "markdown line {line_no}: invalid deadline '{}' (use YYYY-MM-DD)",
                    &caps["deadline"]
                )
            })?;

        let mut task = Task::new(
            format!("md-{:04}", out.len() + 1),
            &caps["name"],
            priority,
            difficulty,
            deadline,
        );
        task.subject = subject.clone();
        task.is_completed = &caps["done"] != " ";
        out.push(task);
    }

    Ok(out)
}

pub fn load_tasks_md(path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let path = path.as_ref();
    let md = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_tasks_md(&md).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::RankError;

    #[test]
    fn test_parse_tasks_md() {
        let md = r#"
# Spring term

Loose notes are ignored.

## Physics
- [ ] Lab report | High | Hard | 2026-03-02
- [x] Reading chapter 4 | Low | Easy | 2026-02-20

## Math
* [ ] Problem set 6 | low | medium | 2026-03-05
- plain bullet without checkbox
"#;
        let tasks = parse_tasks_md(md).unwrap();
        assert_eq!(tasks.len(), 3);

        assert_eq!(tasks[0].id, "md-0001");
        assert_eq!(tasks[0].name, "Lab report");
        assert_eq!(tasks[0].subject.as_deref(), Some("Physics"));
        assert_eq!(tasks[0].priority, Priority::High);
        assert!(!tasks[0].is_completed);

        assert!(tasks[1].is_completed);

        assert_eq!(tasks[2].id, "md-0003");
        assert_eq!(tasks[2].subject.as_deref(), Some("Math"));
        assert_eq!(tasks[2].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_items_before_any_heading_have_no_subject() {
        let tasks = parse_tasks_md("- [ ] Taxes | High | Medium | 2026-04-15\n").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].subject, None);
    }

    #[test]
    fn test_bad_difficulty_fails_fast() {
        let md = "## X\n- [ ] Thing | High | Brutal | 2026-04-15\n";
        let err = parse_tasks_md(md).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(matches!(
            err.downcast_ref::<RankError>(),
            Some(RankError::InvalidCriterionValue { field: "difficulty", .. })
        ));
    }

    #[test]
    fn test_checkbox_with_wrong_field_count_fails() {
        let missing = "- [ ] Essay | High | Easy | 2026-04-15\n- [ ] Lab report | High | Hard\n";
        let err = parse_tasks_md(missing).unwrap_err();
        assert!(err.to_string().contains("markdown line 2"));

        let extra = "- [ ] Essay | High | Easy | 2026-04-15\n\n- [x] Quiz | Low | Easy | 2026-04-01 | notes\n";
        let err = parse_tasks_md(extra).unwrap_err();
        assert!(err.to_string().contains("markdown line 3"));
        assert!(err.to_string().contains("Quiz"));
    }

    #[test]
    fn test_bad_deadline_fails() {
        let err = parse_tasks_md("- [ ] Thing | High | Easy | next week\n").unwrap_err();
        assert!(err.to_string().contains("invalid deadline"));
    }
}
