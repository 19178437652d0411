use std::f64::consts::{LN_10, PI};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use thiserror::Error;

use crate::model::constants::{
    DEFAULT_DEVIATION, DEFAULT_RATING, DEVIATION_MAX, DEVIATION_MIN, RATING_SCALE,
    VOLATILITY_GROWTH_RATE
};

/// 400 rating points correspond to one order of magnitude of odds.
const Q: f64 = LN_10 / RATING_SCALE;

/// Rejected input to a rating operation. Every condition is checked before
/// any arithmetic runs, so a NaN never propagates through an update.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RatingError {
    #[error("deviation must be non-negative, got {0}")]
    NegativeDeviation(f64),

    #[error("deviation bounds are inverted: min {min} > max {max}")]
    InvertedDeviationBounds { min: f64, max: f64 },

    #[error("outcome must be within [0.0, 1.0], got {0}")]
    OutcomeOutOfRange(f64),

    #[error("rating and deviation must be finite, got rating {rating}, deviation {deviation}")]
    NonFinite { rating: f64, deviation: f64 }
}

/// A participant's belief state at a point in time: the skill estimate, the
/// uncertainty attached to it, and when it was last brought up to date.
///
/// Both update steps return a new value instead of mutating `self`, so a
/// caller that wants to report a delta keeps the prior state itself rather
/// than relying on aliasing.
///
/// Tuning lives on the state, not in process-wide configuration, so
/// independently tuned rating scales can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingState {
    pub rating: f64,
    pub deviation: f64,
    pub last_update: Option<DateTime<FixedOffset>>,
    volatility_rate: f64,
    deviation_min: f64,
    deviation_max: f64
}

impl Default for RatingState {
    fn default() -> Self {
        RatingState {
            rating: DEFAULT_RATING,
            deviation: DEFAULT_DEVIATION,
            last_update: None,
            volatility_rate: VOLATILITY_GROWTH_RATE,
            deviation_min: DEVIATION_MIN,
            deviation_max: DEVIATION_MAX
        }
    }
}

impl RatingState {
    /// A state with default tuning and no update history.
    pub fn new(rating: f64, deviation: f64) -> Result<RatingState, RatingError> {
        RatingState {
            rating,
            deviation,
            ..RatingState::default()
        }
        .validated()
    }

    /// Full constructor carrying per-state tuning.
    pub fn with_tuning(
        rating: f64,
        deviation: f64,
        last_update: Option<DateTime<FixedOffset>>,
        volatility_rate: f64,
        deviation_min: f64,
        deviation_max: f64
    ) -> Result<RatingState, RatingError> {
        RatingState {
            rating,
            deviation,
            last_update,
            volatility_rate,
            deviation_min,
            deviation_max
        }
        .validated()
    }

    fn validated(self) -> Result<RatingState, RatingError> {
        if !self.rating.is_finite() || !self.deviation.is_finite() {
            return Err(RatingError::NonFinite {
                rating: self.rating,
                deviation: self.deviation
            });
        }
        if self.deviation < 0.0 {
            return Err(RatingError::NegativeDeviation(self.deviation));
        }
        if self.deviation_min > self.deviation_max {
            return Err(RatingError::InvertedDeviationBounds {
                min: self.deviation_min,
                max: self.deviation_max
            });
        }

        Ok(self)
    }

    /// STEP 1 of the rating update: confidence decays while the participant
    /// is idle.
    ///
    /// Elapsed time is measured in seconds since `last_update`. A state that
    /// has never been updated advances with zero elapsed time, and so does a
    /// `now` earlier than `last_update`: deviation stays monotonic-or-flat
    /// under decay instead of shrinking through a negative delta.
    pub fn advance_time(&self, now: DateTime<FixedOffset>) -> Result<RatingState, RatingError> {
        self.validated()?;

        let elapsed = match self.last_update {
            Some(last) => (now - last).num_seconds().max(0) as f64,
            None => 0.0
        };
        let deviation = (self.deviation.powi(2) + self.volatility_rate.powi(2) * elapsed)
            .sqrt()
            .clamp(self.deviation_min, self.deviation_max);

        Ok(RatingState {
            deviation,
            last_update: Some(now),
            ..*self
        })
    }

    /// STEP 2 of the rating update: resolve a single match against
    /// `opponent`.
    ///
    /// `outcome` is continuous in `[0.0, 1.0]`: 1.0 is a win, 0.0 a loss,
    /// fractional values are partial credit.
    ///
    /// The opponent's rating gap is attenuated by `g(opponent.deviation)`,
    /// the expected score follows from the attenuated gap, and the match
    /// contributes `d_inv` of information. The updated variance is clamped
    /// in squared units, before the square root is taken.
    ///
    /// `last_update` is untouched here; only [`RatingState::advance_time`]
    /// moves the clock.
    pub fn resolve_match(
        &self,
        opponent: &RatingState,
        outcome: f64
    ) -> Result<RatingState, RatingError> {
        self.validated()?;
        opponent.validated()?;
        if !(0.0..=1.0).contains(&outcome) {
            return Err(RatingError::OutcomeOutOfRange(outcome));
        }

        let g = impact_factor(opponent.deviation);
        let expected = self.expected_score(opponent);
        let d_inv = Q.powi(2) * g.powi(2) * expected * (1.0 - expected);
        let variance = (1.0 / (1.0 / self.deviation.powi(2) + d_inv))
            .clamp(self.deviation_min.powi(2), self.deviation_max.powi(2));

        Ok(RatingState {
            rating: self.rating + Q * variance * g * (outcome - expected),
            deviation: variance.sqrt(),
            ..*self
        })
    }

    /// Win probability of `self` against `opponent` implied by the current
    /// ratings, attenuated by the opponent's uncertainty. Always in (0, 1).
    pub fn expected_score(&self, opponent: &RatingState) -> f64 {
        let g = impact_factor(opponent.deviation);

        1.0 / (1.0 + 10f64.powf(-g * (self.rating - opponent.rating) / RATING_SCALE))
    }
}

/// Attenuation applied to an opponent's rating gap based on that opponent's
/// own uncertainty. 1.0 for a perfectly confident opponent, shrinking as the
/// opponent's deviation grows.
fn impact_factor(deviation: f64) -> f64 {
    1.0 / (1.0 + 3.0 * Q.powi(2) * deviation.powi(2) / PI.powi(2)).sqrt()
}
