use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::model::{
    constants::{DIFFICULTY_BAND_WIDTH, PERFECT_SCORE},
    structures::performance_grade::PerformanceGrade
};

/// Wall-clock solve time as it appears in the report: whole minutes plus
/// leftover seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolveTime {
    pub minutes: u32,
    pub seconds: u32
}

impl SolveTime {
    pub fn total_seconds(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }
}

/// One parsed skill-check attempt: the task's identity and declared
/// difficulty plus the user's submission result and the aggregate statistics
/// the report carries for the task.
#[derive(Debug, Clone, Serialize)]
pub struct SkillCheck {
    pub task_id: String,
    pub title: String,
    pub timestamp: DateTime<FixedOffset>,
    pub language: String,
    pub solve_time: SolveTime,
    pub grade: PerformanceGrade,
    pub score: u32,
    /// The task's difficulty, used to seed the opponent rating state.
    pub level_rating: f64,
    pub level_deviation: f64,
    pub submissions: u32,
    pub accuracy: f64,
    pub avg_solve_time: SolveTime,
    pub avg_score: f64
}

impl SkillCheck {
    /// Outcome of the match against the task: full marks clear the check,
    /// anything else loses it.
    pub fn outcome(&self) -> f64 {
        if self.score == PERFECT_SCORE {
            1.0
        } else {
            0.0
        }
    }

    /// Floor of the difficulty band this task falls into.
    pub fn difficulty_band(&self) -> i64 {
        (self.level_rating / DIFFICULTY_BAND_WIDTH).floor() as i64 * DIFFICULTY_BAND_WIDTH as i64
    }
}
