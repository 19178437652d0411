use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Letter grade the grader attaches to a submission, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
pub enum PerformanceGrade {
    S,
    A,
    B,
    C,
    D,
    E
}
