pub mod performance_grade;
pub mod rating_adjustment;
pub mod rating_adjustment_type;
pub mod skill_check;
