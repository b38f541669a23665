//! Rendering a ranking for the terminal or as JSON.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use taskrank_core::{CRITERIA_COUNT, Directions, RankedTask, Ranking};

/// JSON payload: the parameters echoed back plus the ranked tasks.
#[derive(Debug, Serialize)]
pub struct Payload<'a> {
    pub parameters: Parameters,
    pub tasks: &'a [RankedTask<'a>],
}

#[derive(Debug, Serialize)]
pub struct Parameters {
    /// Weights as requested, before scaling.
    pub weights: [f64; CRITERIA_COUNT],
    pub normalized_weights: [f64; CRITERIA_COUNT],
    pub criteria_directions: Directions,
    pub criteria_names: [&'static str; CRITERIA_COUNT],
}

pub fn payload<'a>(ranking: &'a Ranking<'a>, limit: Option<usize>) -> Payload<'a> {
    let n = limit.unwrap_or(ranking.items.len()).min(ranking.items.len());
    Payload {
        parameters: Parameters {
            weights: ranking.requested_weights,
            normalized_weights: ranking.weights,
            criteria_directions: ranking.directions,
            criteria_names: ranking.criteria_names,
        },
        tasks: &ranking.items[..n],
    }
}

pub fn render_json(ranking: &Ranking<'_>, limit: Option<usize>) -> Result<String> {
    serde_json::to_string_pretty(&payload(ranking, limit)).context("serialize ranking")
}

pub fn render_text(ranking: &Ranking<'_>, now: NaiveDateTime, limit: Option<usize>) -> String {
    let mut out = String::new();
    let [wp, wd, wh] = ranking.weights;
    let dirs: Vec<&str> = ranking
        .directions
        .as_array()
        .iter()
        .map(|d| d.as_str())
        .collect();

    out.push_str(&format!("# Ranked tasks as of {}\n", now.format("%Y-%m-%d %H:%M")));
    out.push_str(&format!(
        "weights {:.2}/{:.2}/{:.2} | directions {} | criteria {}\n\n",
        wp,
        wd,
        wh,
        dirs.join("/"),
        ranking.criteria_names.join("/")
    ));

    if ranking.is_empty() {
        out.push_str("(no pending tasks)\n");
        return out;
    }

    let n = limit.unwrap_or(ranking.items.len());
    for item in ranking.items.iter().take(n) {
        let t = item.task;
        let subject = t
            .subject
            .as_deref()
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:>3}. {:.4}  {:<4}  {:<6}  {}  {:>8.1}h  {}{}\n",
            item.position,
            item.score,
            t.priority,
            t.difficulty,
            t.deadline,
            item.criteria.hours_left,
            t.name,
            subject
        ));
    }

    if n < ranking.len() {
        out.push_str(&format!("\n... {} more\n", ranking.len() - n));
    }
    out
}
