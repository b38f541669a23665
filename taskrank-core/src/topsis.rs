//! TOPSIS ranking pipeline.
//!
//! criteria extraction -> vector normalization -> weighting -> ideal /
//! anti-ideal points -> Euclidean distances -> closeness -> stable sort.
//!
//! Every stage needs a global view of a column, so the whole snapshot is
//! materialized before anything is scored. The pipeline is pure: no clock
//! reads, no shared state.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::criteria::{self, CRITERIA_COUNT, CRITERIA_NAMES, CriterionVector};
use crate::error::RankError;
use crate::params::{Direction, Directions, RankParams, Weights};
use crate::task::Task;

/// One row of the decision matrix.
pub type Row = [f64; CRITERIA_COUNT];

/// Keeps the closeness denominator positive when a task sits on both points.
pub const CLOSENESS_EPSILON: f64 = 1e-10;

/// Best and worst weighted value per criterion across the snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealPoints {
    pub ideal: Row,
    pub anti_ideal: Row,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedTask<'a> {
    /// 1-based rank.
    pub position: usize,
    #[serde(flatten)]
    pub task: &'a Task,
    #[serde(rename = "topsis_score")]
    pub score: f64,
    pub criteria: CriterionVector,
}

/// Ranked tasks plus the parameters actually used to rank them.
#[derive(Debug, Clone, Serialize)]
pub struct Ranking<'a> {
    /// Normalized weights.
    pub weights: [f64; CRITERIA_COUNT],
    /// Weights as the caller supplied them.
    pub requested_weights: [f64; CRITERIA_COUNT],
    pub directions: Directions,
    pub criteria_names: [&'static str; CRITERIA_COUNT],
    pub items: Vec<RankedTask<'a>>,
}

impl Ranking<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn decision_matrix(tasks: &[Task], now: NaiveDateTime) -> Vec<CriterionVector> {
    tasks.iter().map(|t| criteria::encode(t, now)).collect()
}

/// Scale each column to unit Euclidean norm.
///
/// A column whose norm is zero (every value is 0) is left as is.
pub fn normalize_columns(rows: &mut [Row]) {
    for col in 0..CRITERIA_COUNT {
        let norm = rows.iter().map(|r| r[col] * r[col]).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        for r in rows.iter_mut() {
            r[col] /= norm;
        }
    }
}

pub fn apply_weights(rows: &mut [Row], weights: &Weights) {
    let w = weights.as_array();
    for r in rows.iter_mut() {
        for (v, w) in r.iter_mut().zip(w) {
            *v *= w;
        }
    }
}

/// Ideal and anti-ideal points. An empty matrix yields the origin for both.
pub fn ideal_points(rows: &[Row], directions: &Directions) -> IdealPoints {
    let mut ideal = [0.0; CRITERIA_COUNT];
    let mut anti_ideal = [0.0; CRITERIA_COUNT];
    if rows.is_empty() {
        return IdealPoints { ideal, anti_ideal };
    }

    for (col, dir) in directions.as_array().into_iter().enumerate() {
        let max = rows.iter().map(|r| r[col]).fold(f64::NEG_INFINITY, f64::max);
        let min = rows.iter().map(|r| r[col]).fold(f64::INFINITY, f64::min);
        (ideal[col], anti_ideal[col]) = match dir {
            Direction::Maximize => (max, min),
            Direction::Minimize => (min, max),
        };
    }

    IdealPoints { ideal, anti_ideal }
}

fn distance(a: &Row, b: &Row) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Relative closeness to the ideal point, in [0, 1].
pub fn closeness(row: &Row, points: &IdealPoints) -> f64 {
    let d_pos = distance(row, &points.ideal);
    let d_neg = distance(row, &points.anti_ideal);
    d_neg / (d_pos + d_neg + CLOSENESS_EPSILON)
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    (value * factor).round() / factor
}

/// Rank `tasks` by descending closeness.
///
/// Every task passed in is treated as eligible; filtering completed work is
/// the caller's job. Exact ties keep input order.
pub fn rank<'a>(tasks: &'a [Task], params: &RankParams, now: NaiveDateTime) -> Ranking<'a> {
    let mut ranking = Ranking {
        weights: params.weights.as_array(),
        requested_weights: params.weights.raw(),
        directions: params.directions,
        criteria_names: CRITERIA_NAMES,
        items: Vec::new(),
    };

    if tasks.is_empty() {
        tracing::debug!("no tasks to rank");
        return ranking;
    }

    tracing::debug!(
        tasks = tasks.len(),
        weights = ?ranking.weights,
        directions = ?params.directions.as_array(),
        "ranking tasks"
    );

    let raw = decision_matrix(tasks, now);
    let mut rows: Vec<Row> = raw.iter().map(CriterionVector::as_array).collect();
    normalize_columns(&mut rows);
    apply_weights(&mut rows, &params.weights);
    let points = ideal_points(&rows, &params.directions);

    let mut scored: Vec<(usize, f64)> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let score = closeness(row, &points);
            tracing::trace!(task = %tasks[i].id, score, "scored");
            (i, score)
        })
        .collect();

    // Stable: equal scores keep their input order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranking.items = scored
        .into_iter()
        .enumerate()
        .map(|(pos, (i, score))| RankedTask {
            position: pos + 1,
            task: &tasks[i],
            score: round_to(score, params.precision),
            criteria: raw[i],
        })
        .collect();

    ranking
}

/// Validate raw weight/direction specs, then rank.
///
/// A bad specification fails before any task is encoded.
pub fn rank_with_spec<'a>(
    tasks: &'a [Task],
    weights: &str,
    directions: &str,
    now: NaiveDateTime,
) -> Result<Ranking<'a>, RankError> {
    let params = RankParams::from_spec(weights, directions)?;
    Ok(rank(tasks, &params, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Difficulty, Priority};
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 19)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn task(id: &str, p: Priority, d: Difficulty, days: i64) -> Task {
        Task::new(id, id, p, d, now().date() + Duration::days(days))
    }

    #[test]
    fn test_normalize_unit_columns() {
        let mut rows = vec![[3.0, 1.0, 0.0], [4.0, 1.0, 0.0]];
        normalize_columns(&mut rows);
        assert!((rows[0][0] - 0.6).abs() < 1e-12);
        assert!((rows[1][0] - 0.8).abs() < 1e-12);
        let sq: f64 = rows.iter().map(|r| r[1] * r[1]).sum();
        assert!((sq - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_column_left_untouched() {
        let mut rows = vec![[1.0, 1.0, 0.0], [2.0, 5.0, 0.0]];
        normalize_columns(&mut rows);
        assert_eq!(rows[0][2], 0.0);
        assert_eq!(rows[1][2], 0.0);
        assert!(rows.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_ideal_points_follow_directions() {
        let rows = vec![[0.1, 0.5, 0.2], [0.3, 0.4, 0.9]];
        let dirs = Directions::new([Direction::Maximize, Direction::Minimize, Direction::Minimize]);
        let p = ideal_points(&rows, &dirs);
        assert_eq!(p.ideal, [0.3, 0.4, 0.2]);
        assert_eq!(p.anti_ideal, [0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_closeness_extremes() {
        let p = IdealPoints {
            ideal: [1.0, 1.0, 0.0],
            anti_ideal: [0.0, 0.0, 1.0],
        };
        assert!(closeness(&[1.0, 1.0, 0.0], &p) > 0.9999);
        assert_eq!(closeness(&[0.0, 0.0, 1.0], &p), 0.0);
        let mid = closeness(&[0.5, 0.5, 0.5], &p);
        assert!((mid - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_concrete_two_task_scenario() {
        // A: High/Hard due in 24h, B: Low/Easy due in 168h.
        let tasks = vec![
            task("B", Priority::Low, Difficulty::Easy, 7),
            task("A", Priority::High, Difficulty::Hard, 1),
        ];
        let r = rank(&tasks, &RankParams::default(), now());
        assert_eq!(r.items[0].task.id, "A");
        assert_eq!(r.items[0].criteria.hours_left, 24.0);
        assert_eq!(r.items[1].criteria.hours_left, 168.0);
        // A dominates on every criterion, so it sits on the ideal point.
        assert_eq!(r.items[0].score, 1.0);
        assert_eq!(r.items[1].score, 0.0);
        assert_eq!(r.items[0].position, 1);
        assert_eq!(r.items[1].position, 2);
    }

    #[test]
    fn test_empty_input() {
        let r = rank(&[], &RankParams::default(), now());
        assert!(r.is_empty());
        assert_eq!(r.criteria_names, ["priority", "difficulty", "deadline"]);
        assert_eq!(r.weights, Weights::default().as_array());
        assert_eq!(r.requested_weights, [0.2, 0.2, 0.6]);
    }

    #[test]
    fn test_single_task_scores_zero() {
        let tasks = vec![task("solo", Priority::High, Difficulty::Hard, 3)];
        let r = rank(&tasks, &RankParams::default(), now());
        assert_eq!(r.len(), 1);
        assert_eq!(r.items[0].score, 0.0);
    }

    #[test]
    fn test_all_overdue_falls_back_to_other_criteria() {
        let tasks = vec![
            task("low", Priority::Low, Difficulty::Easy, -3),
            task("high", Priority::High, Difficulty::Easy, -10),
        ];
        let r = rank(&tasks, &RankParams::default(), now());
        assert!(r.items.iter().all(|i| i.criteria.hours_left == 0.0));
        assert!(r.items.iter().all(|i| i.score.is_finite()));
        assert_eq!(r.items[0].task.id, "high");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tasks = vec![
            task("first", Priority::High, Difficulty::Medium, 2),
            task("second", Priority::High, Difficulty::Medium, 2),
            task("third", Priority::High, Difficulty::Medium, 2),
        ];
        let r = rank(&tasks, &RankParams::default(), now());
        let ids: Vec<&str> = r.items.iter().map(|i| i.task.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_scores_are_rounded() {
        let tasks = vec![
            task("a", Priority::High, Difficulty::Easy, 5),
            task("b", Priority::Low, Difficulty::Hard, 2),
            task("c", Priority::Low, Difficulty::Medium, 9),
        ];
        let r = rank(&tasks, &RankParams::default().with_precision(2), now());
        for item in &r.items {
            assert_eq!(item.score, (item.score * 100.0).round() / 100.0);
        }
    }

    #[test]
    fn test_rank_with_spec_rejects_bad_weights() {
        let tasks = vec![task("a", Priority::High, Difficulty::Easy, 5)];
        let err = rank_with_spec(&tasks, "0.5,0.5", "max,max,min", now()).unwrap_err();
        assert!(matches!(err, RankError::InvalidParameters { .. }));
    }

    #[test]
    fn test_ranked_task_serializes_flat() {
        let tasks = vec![task("a", Priority::High, Difficulty::Easy, 1).with_subject("Math")];
        let r = rank(&tasks, &RankParams::default(), now());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["items"][0]["id"], "a");
        assert_eq!(v["items"][0]["subject"], "Math");
        assert_eq!(v["items"][0]["topsis_score"], 0.0);
        assert_eq!(v["directions"], serde_json::json!(["max", "max", "min"]));
    }
}
