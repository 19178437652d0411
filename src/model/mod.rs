pub mod constants;
pub mod rating;
pub mod skill_model;
pub mod structures;
