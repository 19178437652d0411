use itertools::Itertools;
use serde::Serialize;

use crate::model::{
    constants::DIFFICULTY_BAND_WIDTH,
    structures::{
        rating_adjustment::RatingAdjustment,
        skill_check::{SkillCheck, SolveTime}
    }
};

/// Win/attempt tally for one difficulty band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTally {
    /// Lowest rating in the band, e.g. 1500 for the 1500-1599 band.
    pub band_floor: i64,
    pub attempts: usize,
    pub clears: usize
}

impl BandTally {
    pub fn clear_rate(&self) -> f64 {
        self.clears as f64 / self.attempts as f64
    }
}

/// Groups checks into difficulty bands, counting attempts and clears per
/// band. Bands come back ordered easiest first; only attempted bands appear.
pub fn band_tallies(checks: &[SkillCheck]) -> Vec<BandTally> {
    checks
        .iter()
        .map(|check| (check.difficulty_band(), check))
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(band, _)| *band)
        .map(|(band_floor, group)| BandTally {
            band_floor,
            attempts: group.len(),
            clears: group.iter().filter(|check| check.outcome() == 1.0).count()
        })
        .collect()
}

/// One human-readable line per processed check: when, what, how it went, and
/// what the check did to the rating.
pub fn result_line(check: &SkillCheck, adjustment: &RatingAdjustment) -> String {
    let before = adjustment.rating_before.round() as i64;
    let after = adjustment.rating_after.round() as i64;

    let mut line = format!(
        "[{}] task: {} level: {:>4} +-{:>2}  >> lang: {:<7} score: {:>3} ({:>7})",
        check.timestamp.format("%Y-%m-%d"),
        check.task_id,
        check.level_rating.round() as i64,
        check.level_deviation.round() as i64,
        check.language,
        check.score,
        solve_time_display(check.solve_time)
    );
    line.push_str(&format!(" >> rating: {before:>4} -> {after:>4}"));
    if after > before {
        line.push_str(" ↑");
    }

    line
}

/// One table line per band tally.
pub fn band_lines(tallies: &[BandTally]) -> Vec<String> {
    let band_span = DIFFICULTY_BAND_WIDTH as i64 - 1;

    tallies
        .iter()
        .map(|tally| {
            format!(
                "level {:>4}-{:<4} {:>3} attempts, {:>3} clears ({:>5.1}%)",
                tally.band_floor,
                tally.band_floor + band_span,
                tally.attempts,
                tally.clears,
                100.0 * tally.clear_rate()
            )
        })
        .collect()
}

/// Solve times of 1000 minutes and up stand for "did not finish" in the
/// source report and render as unknown.
fn solve_time_display(time: SolveTime) -> String {
    if time.minutes < 1000 {
        format!("{}m{:02}s", time.minutes, time.seconds)
    } else {
        "-m--s".to_string()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        report::formatter::{band_lines, band_tallies, result_line},
        utils::test_utils::generate_skill_checks
    };
    use crate::model::structures::{
        rating_adjustment::RatingAdjustment,
        rating_adjustment_type::RatingAdjustmentType,
        skill_check::SolveTime
    };

    fn adjustment_for(check: &crate::model::structures::skill_check::SkillCheck) -> RatingAdjustment {
        RatingAdjustment {
            task_id: Some(check.task_id.clone()),
            rating_before: 750.4,
            rating_after: 802.6,
            deviation_before: 350.0,
            deviation_after: 290.0,
            outcome: Some(check.outcome()),
            timestamp: check.timestamp,
            adjustment_type: RatingAdjustmentType::Match
        }
    }

    #[test]
    fn test_result_line_layout() {
        let mut check = generate_skill_checks(1, 1500.0, 1.0).pop().unwrap();
        check.task_id = "Q001".to_string();
        check.language = "Rust".to_string();
        check.timestamp = "2020-11-06T21:30:00+00:00".parse().unwrap();
        check.solve_time = SolveTime {
            minutes: 4,
            seconds: 30
        };
        check.score = 100;
        check.level_rating = 1568.0;
        check.level_deviation = 23.0;

        let line = result_line(&check, &adjustment_for(&check));

        assert_eq!(
            line,
            "[2020-11-06] task: Q001 level: 1568 +-23  >> lang: Rust    score: 100 (  4m30s) >> rating:  750 ->  803 ↑"
        );
    }

    #[test]
    fn test_result_line_without_a_gain_has_no_marker() {
        let mut check = generate_skill_checks(1, 1500.0, 1.0).pop().unwrap();
        check.score = 0;
        let mut adjustment = adjustment_for(&check);
        adjustment.rating_after = 741.9;

        let line = result_line(&check, &adjustment);

        assert!(line.ends_with("rating:  750 ->  742"));
    }

    #[test]
    fn test_unfinished_solve_time_renders_unknown() {
        let mut check = generate_skill_checks(1, 1500.0, 1.0).pop().unwrap();
        check.solve_time = SolveTime {
            minutes: 1000,
            seconds: 0
        };

        let line = result_line(&check, &adjustment_for(&check));

        assert!(line.contains("(  -m--s)"));
    }

    #[test]
    fn test_band_tallies_group_and_count() {
        let mut checks = generate_skill_checks(4, 1500.0, 1.0);
        checks[0].level_rating = 1510.0;
        checks[0].score = 100;
        checks[1].level_rating = 1590.0;
        checks[1].score = 40;
        checks[2].level_rating = 1620.0;
        checks[2].score = 100;
        checks[3].level_rating = 1480.0;
        checks[3].score = 100;

        let tallies = band_tallies(&checks);

        assert_eq!(tallies.len(), 3);
        assert_eq!(tallies[0].band_floor, 1400);
        assert_eq!((tallies[0].attempts, tallies[0].clears), (1, 1));
        assert_eq!(tallies[1].band_floor, 1500);
        assert_eq!((tallies[1].attempts, tallies[1].clears), (2, 1));
        assert_eq!(tallies[2].band_floor, 1600);
        assert_eq!((tallies[2].attempts, tallies[2].clears), (1, 1));
        assert_abs_diff_eq!(tallies[1].clear_rate(), 0.5);
    }

    #[test]
    fn test_band_lines_cover_every_tally() {
        let checks = generate_skill_checks(12, 1500.0, 0.5);
        let tallies = band_tallies(&checks);

        let lines = band_lines(&tallies);

        assert_eq!(lines.len(), tallies.len());
        assert!(lines.iter().all(|l| l.starts_with("level ")));
    }
}
