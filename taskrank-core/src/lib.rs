//! taskrank-core: TOPSIS ranking of pending tasks by priority, difficulty and deadline.

pub mod criteria;
pub mod error;
pub mod params;
pub mod task;
pub mod time;
pub mod topsis;

pub use criteria::{CRITERIA_COUNT, CRITERIA_NAMES, CriterionVector};
pub use error::RankError;
pub use params::{Direction, Directions, RankParams, Weights};
pub use task::{Difficulty, Priority, Task};
pub use topsis::{IdealPoints, RankedTask, Ranking, rank, rank_with_spec};
