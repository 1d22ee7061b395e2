// src/examspec.rs

use std::fmt;

use crate::models::exam::GenerateExamRequest;
use crate::models::question::Difficulty;

/// Duration bounds in minutes for a generated exam.
const MIN_DURATION_MINUTES: i64 = 5;
const MAX_DURATION_MINUTES: i64 = 180;

/// First violated constraint of an exam specification. Checks run in a fixed
/// order and stop at the first failure, so the caller can map the tag to one
/// field-level message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecError {
    EmptyExamName,
    InvalidTopic,
    InvalidDuration,
    InvalidCount,
    EmptySpecification,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::EmptyExamName => write!(f, "Exam name must not be empty"),
            SpecError::InvalidTopic => write!(f, "Topic does not exist"),
            SpecError::InvalidDuration => write!(
                f,
                "Duration must be between {} and {} minutes",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
            ),
            SpecError::InvalidCount => write!(f, "Question counts must not be negative"),
            SpecError::EmptySpecification => {
                write!(f, "At least one question must be requested")
            }
        }
    }
}

impl std::error::Error for SpecError {}

/// A specification that passed every constraint. Construction goes through
/// `validate` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSpec {
    pub exam_name: String,
    pub topic_id: i64,
    pub duration_minutes: u32,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

/// The request handed to the generation step: topic, duration and how many
/// questions to draw per difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSpec {
    pub topic_id: i64,
    pub duration_minutes: u32,
    pub counts: Vec<(Difficulty, usize)>,
}

impl ValidatedSpec {
    /// Pure reshape into the generation request. No new validation.
    pub fn to_generation_request(&self) -> GenerationSpec {
        GenerationSpec {
            topic_id: self.topic_id,
            duration_minutes: self.duration_minutes,
            counts: vec![
                (Difficulty::Easy, self.easy),
                (Difficulty::Medium, self.medium),
                (Difficulty::Hard, self.hard),
            ],
        }
    }
}

/// Validates a raw exam-creation form against the known topic catalog.
///
/// Constraints are checked in order, short-circuiting on the first failure:
/// exam name, topic, duration, per-tier counts, then the non-empty-exam rule.
pub fn validate(raw: &GenerateExamRequest, known_topic_ids: &[i64]) -> Result<ValidatedSpec, SpecError> {
    let exam_name = raw.exam_name.trim();
    if exam_name.is_empty() {
        return Err(SpecError::EmptyExamName);
    }

    let topic_id = match raw.topic_id {
        Some(id) if known_topic_ids.contains(&id) => id,
        _ => return Err(SpecError::InvalidTopic),
    };

    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&raw.duration_minutes) {
        return Err(SpecError::InvalidDuration);
    }

    if raw.easy < 0 || raw.medium < 0 || raw.hard < 0 {
        return Err(SpecError::InvalidCount);
    }

    if raw.easy + raw.medium + raw.hard < 1 {
        return Err(SpecError::EmptySpecification);
    }

    Ok(ValidatedSpec {
        exam_name: exam_name.to_string(),
        topic_id,
        duration_minutes: raw.duration_minutes as u32,
        easy: raw.easy as usize,
        medium: raw.medium as usize,
        hard: raw.hard as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        exam_name: &str,
        topic_id: Option<i64>,
        duration_minutes: i64,
        easy: i64,
        medium: i64,
        hard: i64,
    ) -> GenerateExamRequest {
        GenerateExamRequest {
            exam_name: exam_name.to_string(),
            topic_id,
            duration_minutes,
            easy,
            medium,
            hard,
        }
    }

    const TOPICS: &[i64] = &[1, 2, 3];

    #[test]
    fn valid_spec_passes() {
        let spec = validate(&raw("  Midterm 1 ", Some(2), 45, 5, 3, 2), TOPICS).unwrap();
        assert_eq!(spec.exam_name, "Midterm 1");
        assert_eq!(spec.topic_id, 2);
        assert_eq!(spec.duration_minutes, 45);
        assert_eq!((spec.easy, spec.medium, spec.hard), (5, 3, 2));
    }

    #[test]
    fn all_violations_report_the_first_one() {
        // Everything is wrong here; only the name check may fire.
        let err = validate(&raw("   ", None, 0, 0, 0, 0), TOPICS).unwrap_err();
        assert_eq!(err, SpecError::EmptyExamName);
    }

    #[test]
    fn missing_or_unknown_topic_fails() {
        let err = validate(&raw("Quiz", None, 30, 1, 0, 0), TOPICS).unwrap_err();
        assert_eq!(err, SpecError::InvalidTopic);

        let err = validate(&raw("Quiz", Some(99), 30, 1, 0, 0), TOPICS).unwrap_err();
        assert_eq!(err, SpecError::InvalidTopic);
    }

    #[test]
    fn duration_bounds_are_enforced() {
        for minutes in [0, 4, 181, -10] {
            let err = validate(&raw("Quiz", Some(1), minutes, 1, 0, 0), TOPICS).unwrap_err();
            assert_eq!(err, SpecError::InvalidDuration);
        }
        assert!(validate(&raw("Quiz", Some(1), 5, 1, 0, 0), TOPICS).is_ok());
        assert!(validate(&raw("Quiz", Some(1), 180, 1, 0, 0), TOPICS).is_ok());
    }

    #[test]
    fn negative_counts_fail() {
        let err = validate(&raw("Quiz", Some(1), 30, -1, 2, 0), TOPICS).unwrap_err();
        assert_eq!(err, SpecError::InvalidCount);
    }

    #[test]
    fn zero_total_questions_fails_as_empty_specification() {
        let err = validate(&raw("Quiz", Some(1), 30, 0, 0, 0), TOPICS).unwrap_err();
        assert_eq!(err, SpecError::EmptySpecification);
    }

    #[test]
    fn generation_request_is_a_pure_reshape() {
        let spec = validate(&raw("Quiz", Some(3), 60, 4, 0, 1), TOPICS).unwrap();
        let request = spec.to_generation_request();
        assert_eq!(request.topic_id, 3);
        assert_eq!(request.duration_minutes, 60);
        assert_eq!(
            request.counts,
            vec![
                (Difficulty::Easy, 4),
                (Difficulty::Medium, 0),
                (Difficulty::Hard, 1),
            ]
        );
    }
}
