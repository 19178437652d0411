// Model constants
pub const RATING_SCALE: f64 = 400.0;
pub const DEFAULT_RATING: f64 = 1500.0;
pub const DEFAULT_DEVIATION: f64 = 350.0;
pub const DEVIATION_MIN: f64 = 0.0;
pub const DEVIATION_MAX: f64 = 350.0;
pub const VOLATILITY_GROWTH_RATE: f64 = 5.0;
// Skill-check report constants
pub const PERFECT_SCORE: u32 = 100;
pub const DIFFICULTY_BAND_WIDTH: f64 = 100.0;
