use serde::{Deserialize, Serialize};

/// Where a rating adjustment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingAdjustmentType {
    /// The seed entry recorded before any check is processed.
    Initial,
    /// A resolved skill check.
    Match
}
