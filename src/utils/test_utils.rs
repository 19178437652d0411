use chrono::{DateTime, Duration, FixedOffset};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt::Write;

use crate::model::structures::{
    performance_grade::PerformanceGrade,
    skill_check::{SkillCheck, SolveTime}
};

/// Deterministic batch of synthetic skill checks around a target difficulty,
/// one hour apart in chronological order.
///
/// `clear_rate` is the probability (in `[0.0, 1.0]`) that a generated check
/// was cleared with full marks. Seeded RNG, so every run sees the same data.
pub fn generate_skill_checks(n: usize, base_level: f64, clear_rate: f64) -> Vec<SkillCheck> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let start: DateTime<FixedOffset> = "2020-11-06T12:00:00+00:00".parse().unwrap();

    (0..n)
        .map(|i| {
            let cleared = rng.random_bool(clear_rate);

            SkillCheck {
                task_id: format!("Q{:03}", i + 1),
                title: format!("Generated task {}", i + 1),
                timestamp: start + Duration::hours(i as i64),
                language: "Rust".to_string(),
                solve_time: SolveTime {
                    minutes: rng.random_range(1..30),
                    seconds: rng.random_range(0..60)
                },
                grade: if cleared {
                    PerformanceGrade::S
                } else {
                    PerformanceGrade::C
                },
                score: if cleared {
                    100
                } else {
                    rng.random_range(0..100)
                },
                level_rating: (base_level + rng.random_range(-300.0..=300.0)).round(),
                level_deviation: rng.random_range(5.0f64..=50.0).round(),
                submissions: rng.random_range(100..5000),
                accuracy: rng.random_range(100..=900) as f64 / 10.0,
                avg_solve_time: SolveTime {
                    minutes: rng.random_range(1..60),
                    seconds: rng.random_range(0..60)
                },
                avg_score: rng.random_range(400..=950) as f64 / 10.0
            }
        })
        .collect()
}

/// Renders checks back into the three-line report format the parser reads.
pub fn render_report(checks: &[SkillCheck]) -> String {
    let mut out = String::new();

    for check in checks {
        writeln!(
            out,
            "{}: {}, {}",
            check.task_id,
            check.title,
            check.timestamp.format("%Y/%m/%d %H:%M")
        )
        .unwrap();
        writeln!(
            out,
            "{}, {}m{:02}s, {}, {}pt",
            check.language, check.solve_time.minutes, check.solve_time.seconds, check.grade, check.score
        )
        .unwrap();
        writeln!(
            out,
            "level {} +-{}, submitted {}, accuracy {:.1}%, avg {}m{:02}s, avg score {:.1}pt",
            check.level_rating as i64,
            check.level_deviation as i64,
            check.submissions,
            check.accuracy,
            check.avg_solve_time.minutes,
            check.avg_solve_time.seconds,
            check.avg_score
        )
        .unwrap();
    }

    out
}
