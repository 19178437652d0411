use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::structures::{
    performance_grade::PerformanceGrade,
    skill_check::{SkillCheck, SolveTime}
};

/// A skill check spans three non-empty report lines:
///
/// ```text
/// Q001: Two pointer warmup, 2020/11/06 21:30
/// Rust, 4m30s, A, 100pt
/// level 1568 +-23, submitted 1234, accuracy 52.5%, avg 12m34s, avg score 85.2pt
/// ```
///
/// Blank lines are skipped. Timestamps carry no zone and are read as UTC.
const LINES_PER_RECORD: usize = 3;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Rejected report input. `record` is the 1-based index of the offending
/// three-line record.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("record {record} is truncated: a skill check spans three lines")]
    TruncatedRecord { record: usize },

    #[error("record {record}: malformed {what}: {value:?}")]
    MalformedField {
        record: usize,
        what: &'static str,
        value: String
    },

    #[error("record {record}: invalid timestamp: {source}")]
    InvalidTimestamp {
        record: usize,
        #[source]
        source: chrono::ParseError
    },

    #[error("record {record}: invalid number in {what}: {value:?}")]
    InvalidNumber {
        record: usize,
        what: &'static str,
        value: String
    },

    #[error("record {record}: unknown performance grade {value:?}")]
    UnknownGrade { record: usize, value: String }
}

/// Parses a whole report into typed checks, in file order.
pub fn parse_report(input: &str) -> Result<Vec<SkillCheck>, ReportError> {
    let lines = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();

    let mut checks = Vec::with_capacity(lines.len() / LINES_PER_RECORD);
    for (index, chunk) in lines.chunks(LINES_PER_RECORD).enumerate() {
        let record = index + 1;
        match chunk {
            [title, result, aggregate] => checks.push(parse_record(record, title, result, aggregate)?),
            _ => return Err(ReportError::TruncatedRecord { record })
        }
    }

    Ok(checks)
}

fn parse_record(
    record: usize,
    title_line: &str,
    result_line: &str,
    aggregate_line: &str
) -> Result<SkillCheck, ReportError> {
    let (task_id, title, timestamp) = parse_title_line(record, title_line)?;
    let (language, solve_time, grade, score) = parse_result_line(record, result_line)?;
    let aggregate = parse_aggregate_line(record, aggregate_line)?;

    Ok(SkillCheck {
        task_id,
        title,
        timestamp,
        language,
        solve_time,
        grade,
        score,
        level_rating: aggregate.level_rating,
        level_deviation: aggregate.level_deviation,
        submissions: aggregate.submissions,
        accuracy: aggregate.accuracy,
        avg_solve_time: aggregate.avg_solve_time,
        avg_score: aggregate.avg_score
    })
}

/// `<id>: <title>, <YYYY/MM/DD HH:MM>`. The title may itself contain commas;
/// the timestamp is everything after the last one.
fn parse_title_line(
    record: usize,
    line: &str
) -> Result<(String, String, chrono::DateTime<chrono::FixedOffset>), ReportError> {
    let (head, date) = line
        .rsplit_once(',')
        .ok_or_else(|| malformed(record, "title line", line))?;
    let (task_id, title) = head
        .split_once(':')
        .ok_or_else(|| malformed(record, "title line", line))?;

    let timestamp = NaiveDateTime::parse_from_str(date.trim(), TIMESTAMP_FORMAT)
        .map_err(|source| ReportError::InvalidTimestamp { record, source })?
        .and_utc()
        .fixed_offset();

    Ok((task_id.trim().to_string(), title.trim().to_string(), timestamp))
}

/// `<language>, <duration>, <grade>, <score>pt`
fn parse_result_line(
    record: usize,
    line: &str
) -> Result<(String, SolveTime, PerformanceGrade, u32), ReportError> {
    let fields = split_trim(line);
    let [language, time_field, grade_field, score_field] = fields.as_slice() else {
        return Err(malformed(record, "result line", line));
    };

    let solve_time = parse_duration(record, time_field)?;
    let grade = grade_field
        .chars()
        .next()
        .map(|c| c.to_string())
        .and_then(|s| PerformanceGrade::from_str(&s).ok())
        .ok_or_else(|| ReportError::UnknownGrade {
            record,
            value: grade_field.to_string()
        })?;
    let score = digits(score_field)
        .parse::<u32>()
        .map_err(|_| invalid_number(record, "score", score_field))?;

    Ok((language.to_string(), solve_time, grade, score))
}

struct AggregateFields {
    level_rating: f64,
    level_deviation: f64,
    submissions: u32,
    accuracy: f64,
    avg_solve_time: SolveTime,
    avg_score: f64
}

/// `level <r> +-<d>, submitted <n>, accuracy <f>%, avg <duration>, avg score <f>pt`
fn parse_aggregate_line(record: usize, line: &str) -> Result<AggregateFields, ReportError> {
    let fields = split_trim(line);
    let [level_field, submitted_field, accuracy_field, avg_time_field, avg_score_field] =
        fields.as_slice()
    else {
        return Err(malformed(record, "aggregate line", line));
    };

    let level = level_field
        .replace("+-", " ")
        .split_whitespace()
        .filter_map(|token| token.parse::<f64>().ok())
        .collect::<Vec<_>>();
    let [level_rating, level_deviation] = level.as_slice() else {
        return Err(malformed(record, "difficulty", level_field));
    };

    let submissions = digits(submitted_field)
        .parse::<u32>()
        .map_err(|_| invalid_number(record, "submissions", submitted_field))?;
    let accuracy = decimal(accuracy_field)
        .parse::<f64>()
        .map_err(|_| invalid_number(record, "accuracy", accuracy_field))?;

    let avg_duration_token = avg_time_field
        .split_whitespace()
        .last()
        .ok_or_else(|| malformed(record, "average time", avg_time_field))?;
    let avg_solve_time = parse_duration(record, avg_duration_token)?;

    let avg_score = decimal(avg_score_field)
        .parse::<f64>()
        .map_err(|_| invalid_number(record, "average score", avg_score_field))?;

    Ok(AggregateFields {
        level_rating: *level_rating,
        level_deviation: *level_deviation,
        submissions,
        accuracy,
        avg_solve_time,
        avg_score
    })
}

/// `<M>m<SS>s`, e.g. `4m30s` or `1234m00s`.
fn parse_duration(record: usize, field: &str) -> Result<SolveTime, ReportError> {
    let trimmed = field.trim();
    let body = trimmed.strip_suffix('s').unwrap_or(trimmed);
    let Some((minutes, seconds)) = body.split_once('m') else {
        return Err(malformed(record, "duration", field));
    };

    Ok(SolveTime {
        minutes: minutes
            .trim()
            .parse()
            .map_err(|_| invalid_number(record, "duration minutes", field))?,
        seconds: seconds
            .trim()
            .parse()
            .map_err(|_| invalid_number(record, "duration seconds", field))?
    })
}

fn split_trim(line: &str) -> Vec<&str> {
    line.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect()
}

fn digits(field: &str) -> String {
    field.chars().filter(char::is_ascii_digit).collect()
}

fn decimal(field: &str) -> String {
    field
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

fn malformed(record: usize, what: &'static str, value: &str) -> ReportError {
    ReportError::MalformedField {
        record,
        what,
        value: value.to_string()
    }
}

fn invalid_number(record: usize, what: &'static str, value: &str) -> ReportError {
    ReportError::InvalidNumber {
        record,
        what,
        value: value.to_string()
    }
}
