use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::model::structures::rating_adjustment_type::RatingAdjustmentType;

/// One applied rating change. The history of these is what the report
/// renders; before/after values are snapshots taken around the update, never
/// references into the live state.
#[derive(Debug, Clone, Serialize)]
pub struct RatingAdjustment {
    /// Task the user was matched against; `None` for the initial seed entry.
    pub task_id: Option<String>,
    pub rating_before: f64,
    pub rating_after: f64,
    pub deviation_before: f64,
    pub deviation_after: f64,
    /// Outcome fed to the engine; `None` for the initial seed entry.
    pub outcome: Option<f64>,
    pub timestamp: DateTime<FixedOffset>,
    pub adjustment_type: RatingAdjustmentType
}
