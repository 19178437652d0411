use std::fs;

use clap::Parser;
use itertools::Itertools;
use skillcheck_processor::{
    args::Args,
    model::{rating::RatingState, skill_model::SkillModel},
    report::{formatter, parser}
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("skillcheck_processor={}", args.log_level))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let report = fs::read_to_string(&args.report).expect("Expected readable skill-check report file");
    let checks = parser::parse_report(&report).expect("Expected well-formed skill-check report");
    info!("Parsed {} skill checks", checks.len());

    let initial = RatingState::new(args.initial_rating, args.initial_deviation)
        .expect("Expected valid initial rating parameters");
    let mut model = SkillModel::new(initial);
    model.process(&checks).expect("Expected processable skill checks");

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&model).expect("Expected serializable result")
        );
        return;
    }

    // Match adjustments pair one-to-one with the chronologically sorted checks.
    let ordered = checks.iter().sorted_by_key(|c| c.timestamp).collect_vec();
    for (check, adjustment) in ordered.iter().zip(model.match_adjustments()) {
        println!("{}", formatter::result_line(check, adjustment));
    }

    println!();
    for line in formatter::band_lines(&formatter::band_tallies(&checks)) {
        println!("{line}");
    }

    let user = model.current_rating();
    println!();
    println!(
        "Final rating: {:.0} (deviation {:.0}) after {} checks",
        user.rating,
        user.deviation,
        checks.len()
    );
}
