use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::{
    model::{
        rating::{RatingError, RatingState},
        structures::{
            rating_adjustment::RatingAdjustment,
            rating_adjustment_type::RatingAdjustmentType,
            skill_check::SkillCheck
        }
    },
    utils::progress_utils::progress_bar
};

/// Replays a series of skill checks through the rating engine.
///
/// The model owns the single user-side [`RatingState`] and the history of
/// adjustments applied to it. Tasks are transient opponents: each check seeds
/// a fresh state from the difficulty the report declares for it.
#[derive(Debug, Serialize)]
pub struct SkillModel {
    user: RatingState,
    adjustments: Vec<RatingAdjustment>
}

impl SkillModel {
    pub fn new(initial: RatingState) -> SkillModel {
        SkillModel {
            user: initial,
            adjustments: Vec::new()
        }
    }

    /// Processes checks in chronological order regardless of input order.
    ///
    /// For each check the "before" snapshot is taken prior to the update;
    /// the engine returns a new state rather than mutating the old one, so
    /// the snapshot stays valid for reporting.
    pub fn process(&mut self, checks: &[SkillCheck]) -> Result<(), RatingError> {
        let ordered = checks.iter().sorted_by_key(|c| c.timestamp).collect_vec();

        if self.adjustments.is_empty() {
            if let Some(first) = ordered.first() {
                self.adjustments.push(RatingAdjustment {
                    task_id: None,
                    rating_before: self.user.rating,
                    rating_after: self.user.rating,
                    deviation_before: self.user.deviation,
                    deviation_after: self.user.deviation,
                    outcome: None,
                    timestamp: first.timestamp,
                    adjustment_type: RatingAdjustmentType::Initial
                });
            }
        }

        let bar = progress_bar(ordered.len() as u64, "Processing skill checks".to_string());
        for check in ordered {
            let task = RatingState::new(check.level_rating, check.level_deviation)?;
            let outcome = check.outcome();

            let before = self.user;
            self.user = before.resolve_match(&task, outcome)?;

            debug!(
                task_id = %check.task_id,
                outcome,
                rating_before = before.rating,
                rating_after = self.user.rating,
                "resolved skill check"
            );

            self.adjustments.push(RatingAdjustment {
                task_id: Some(check.task_id.clone()),
                rating_before: before.rating,
                rating_after: self.user.rating,
                deviation_before: before.deviation,
                deviation_after: self.user.deviation,
                outcome: Some(outcome),
                timestamp: check.timestamp,
                adjustment_type: RatingAdjustmentType::Match
            });
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok(())
    }

    pub fn current_rating(&self) -> &RatingState {
        &self.user
    }

    /// Every adjustment recorded so far, oldest first.
    pub fn adjustments(&self) -> &[RatingAdjustment] {
        &self.adjustments
    }

    /// `Match` adjustments only, in processing order. These pair one-to-one
    /// with the chronologically sorted checks that produced them.
    pub fn match_adjustments(&self) -> impl Iterator<Item = &RatingAdjustment> {
        self.adjustments
            .iter()
            .filter(|a| a.adjustment_type == RatingAdjustmentType::Match)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        model::{
            rating::RatingState,
            skill_model::SkillModel,
            structures::rating_adjustment_type::RatingAdjustmentType
        },
        utils::test_utils::generate_skill_checks
    };

    #[test]
    fn test_process_records_initial_then_match_adjustments() {
        let checks = generate_skill_checks(5, 1500.0, 1.0);
        let mut model = SkillModel::new(RatingState::new(750.0, 350.0).unwrap());

        model.process(&checks).unwrap();

        let adjustments = model.adjustments();
        assert_eq!(adjustments.len(), 6);
        assert_eq!(adjustments[0].adjustment_type, RatingAdjustmentType::Initial);
        assert!(adjustments[1..]
            .iter()
            .all(|a| a.adjustment_type == RatingAdjustmentType::Match));
    }

    #[test]
    fn test_adjustment_chain_is_contiguous() {
        let checks = generate_skill_checks(8, 1500.0, 0.5);
        let mut model = SkillModel::new(RatingState::new(1500.0, 350.0).unwrap());

        model.process(&checks).unwrap();

        for pair in model.adjustments().windows(2) {
            assert_abs_diff_eq!(pair[0].rating_after, pair[1].rating_before);
            assert_abs_diff_eq!(pair[0].deviation_after, pair[1].deviation_before);
        }
        assert_abs_diff_eq!(
            model.adjustments().last().unwrap().rating_after,
            model.current_rating().rating
        );
    }

    #[test]
    fn test_clearing_every_check_raises_the_rating() {
        let checks = generate_skill_checks(10, 1600.0, 1.0);
        let initial = RatingState::new(750.0, 350.0).unwrap();
        let mut model = SkillModel::new(initial);

        model.process(&checks).unwrap();

        assert!(model.current_rating().rating > initial.rating);
        assert!(model.current_rating().deviation < initial.deviation);
    }

    #[test]
    fn test_processing_is_chronological_regardless_of_input_order() {
        let checks = generate_skill_checks(10, 1500.0, 0.5);
        let reversed = checks.iter().rev().cloned().collect::<Vec<_>>();

        let mut forward = SkillModel::new(RatingState::new(750.0, 350.0).unwrap());
        let mut backward = SkillModel::new(RatingState::new(750.0, 350.0).unwrap());
        forward.process(&checks).unwrap();
        backward.process(&reversed).unwrap();

        assert_eq!(
            forward.current_rating().rating,
            backward.current_rating().rating
        );
        assert_eq!(
            forward.current_rating().deviation,
            backward.current_rating().deviation
        );
    }

    #[test]
    fn test_match_adjustments_skip_the_seed_entry() {
        let checks = generate_skill_checks(4, 1500.0, 1.0);
        let mut model = SkillModel::new(RatingState::new(750.0, 350.0).unwrap());

        model.process(&checks).unwrap();

        assert_eq!(model.match_adjustments().count(), 4);
        assert!(model.match_adjustments().all(|a| a.task_id.is_some()));
    }
}
