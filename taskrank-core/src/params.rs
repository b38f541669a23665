//! Caller-supplied ranking parameters: criterion weights and directions.
//!
//! Both arrive either as typed triples or in their raw comma-separated form
//! ("0.2,0.2,0.6", "max,max,min"). Validation happens up front so that a bad
//! specification never reaches the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::criteria::CRITERIA_COUNT;
use crate::error::RankError;

pub const DEFAULT_WEIGHTS: [f64; CRITERIA_COUNT] = [0.2, 0.2, 0.6];
pub const DEFAULT_DIRECTIONS: [Direction; CRITERIA_COUNT] =
    [Direction::Maximize, Direction::Maximize, Direction::Minimize];

/// Default number of decimal places kept in reported scores.
pub const DEFAULT_PRECISION: u32 = 4;

const WEIGHTS_EXAMPLE: &str = "expected three comma-separated non-negative numbers, e.g. \"0.2,0.2,0.6\"";
const DIRECTIONS_EXAMPLE: &str = "expected three comma-separated tokens of max/min, e.g. \"max,max,min\"";

/// Validated weights, scaled to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    normalized: [f64; CRITERIA_COUNT],
    raw: [f64; CRITERIA_COUNT],
}

impl Weights {
    pub fn new(raw: [f64; CRITERIA_COUNT]) -> Result<Self, RankError> {
        if let Some(bad) = raw.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(RankError::params(format!(
                "weight {bad} is not a non-negative number; {WEIGHTS_EXAMPLE}"
            )));
        }

        if raw.iter().all(|w| *w == 0.0) {
            return Err(RankError::params(format!(
                "weights must not all be zero; {WEIGHTS_EXAMPLE}"
            )));
        }

        Ok(Self {
            normalized: scale_to_unit_sum(raw),
            raw,
        })
    }

    /// Parse the raw "a,b,c" form.
    pub fn parse(spec: &str) -> Result<Self, RankError> {
        let tokens: Vec<&str> = spec.split(',').map(str::trim).collect();
        if tokens.len() != CRITERIA_COUNT {
            return Err(RankError::params(format!(
                "got {} weight(s) in {spec:?}; {WEIGHTS_EXAMPLE}",
                tokens.len()
            )));
        }

        let mut raw = [0.0; CRITERIA_COUNT];
        for (slot, token) in raw.iter_mut().zip(&tokens) {
            *slot = token.parse::<f64>().map_err(|_| {
                RankError::params(format!(
                    "weight {token:?} is not a non-negative number; {WEIGHTS_EXAMPLE}"
                ))
            })?;
        }

        Self::new(raw)
    }

    /// Normalized weights (sum to 1), in criterion order.
    pub fn as_array(&self) -> [f64; CRITERIA_COUNT] {
        self.normalized
    }

    /// Weights as supplied before scaling.
    pub fn raw(&self) -> [f64; CRITERIA_COUNT] {
        self.raw
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            normalized: scale_to_unit_sum(DEFAULT_WEIGHTS),
            raw: DEFAULT_WEIGHTS,
        }
    }
}

/// Divide by the largest weight first so the sum stays finite for huge inputs.
/// Callers guarantee finite, non-negative weights with at least one positive.
fn scale_to_unit_sum(raw: [f64; CRITERIA_COUNT]) -> [f64; CRITERIA_COUNT] {
    let max = raw.iter().copied().fold(0.0, f64::max);
    let scaled = raw.map(|w| w / max);
    let sum: f64 = scaled.iter().sum();
    scaled.map(|w| w / sum)
}

/// Whether larger raw values of a criterion are preferable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "max")]
    Maximize,
    #[serde(rename = "min")]
    Minimize,
}

impl Direction {
    fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "max" => Some(Direction::Maximize),
            "min" => Some(Direction::Minimize),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Maximize => "max",
            Direction::Minimize => "min",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Directions([Direction; CRITERIA_COUNT]);

impl Directions {
    pub fn new(dirs: [Direction; CRITERIA_COUNT]) -> Self {
        Self(dirs)
    }

    /// Parse "max,max,min". Tokens other than max/min resolve to
    /// [`Direction::Maximize`], matching long-standing behaviour.
    pub fn parse(spec: &str) -> Result<Self, RankError> {
        let tokens = split_directions(spec)?;
        let mut dirs = [Direction::Maximize; CRITERIA_COUNT];
        for (slot, token) in dirs.iter_mut().zip(&tokens) {
            *slot = Direction::from_token(token).unwrap_or_else(|| {
                tracing::warn!(token = %token, "unrecognized direction token, treating as max");
                Direction::Maximize
            });
        }
        Ok(Self(dirs))
    }

    /// Like [`Directions::parse`] but rejects anything other than max/min.
    pub fn parse_strict(spec: &str) -> Result<Self, RankError> {
        let tokens = split_directions(spec)?;
        let mut dirs = [Direction::Maximize; CRITERIA_COUNT];
        for (slot, token) in dirs.iter_mut().zip(&tokens) {
            *slot = Direction::from_token(token).ok_or_else(|| {
                RankError::params(format!(
                    "direction {token:?} is not max or min; {DIRECTIONS_EXAMPLE}"
                ))
            })?;
        }
        Ok(Self(dirs))
    }

    pub fn as_array(&self) -> [Direction; CRITERIA_COUNT] {
        self.0
    }
}

impl Default for Directions {
    fn default() -> Self {
        Self(DEFAULT_DIRECTIONS)
    }
}

fn split_directions(spec: &str) -> Result<Vec<&str>, RankError> {
    let tokens: Vec<&str> = spec.split(',').map(str::trim).collect();
    if tokens.len() != CRITERIA_COUNT {
        return Err(RankError::params(format!(
            "got {} direction(s) in {spec:?}; {DIRECTIONS_EXAMPLE}",
            tokens.len()
        )));
    }
    Ok(tokens)
}

/// Everything the engine needs besides the tasks and the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParams {
    pub weights: Weights,
    pub directions: Directions,
    /// Decimal places kept in reported scores.
    pub precision: u32,
}

impl RankParams {
    pub fn new(weights: Weights, directions: Directions) -> Self {
        Self {
            weights,
            directions,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Validate both raw specifications. Weights are checked first.
    pub fn from_spec(weights: &str, directions: &str) -> Result<Self, RankError> {
        Ok(Self::new(Weights::parse(weights)?, Directions::parse(directions)?))
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for RankParams {
    fn default() -> Self {
        Self::new(Weights::default(), Directions::default())
    }
}
