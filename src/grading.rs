// src/grading.rs

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// Classification band derived from a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Band {
    Excellent,
    Good,
    Average,
    Weak,
}

impl Band {
    /// Thresholds are evaluated highest-first so the four predicates
    /// partition [0, 10] with no gap or overlap.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Band::Excellent
        } else if score >= 6.5 {
            Band::Good
        } else if score >= 5.0 {
            Band::Average
        } else {
            Band::Weak
        }
    }
}

/// Errors raised when an exam or a grading result is structurally unusable.
/// These indicate a data integrity problem upstream, not a user mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    /// The exam has zero questions; a score cannot be computed.
    EmptyExam,

    /// A question has no answer marked correct, or more than one.
    MissingAnswerKey { question_id: i64 },

    /// An override referenced a 1-based question number outside the exam.
    QuestionNotFound { question_number: usize },
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingError::EmptyExam => write!(f, "Exam has no questions"),
            GradingError::MissingAnswerKey { question_id } => {
                write!(
                    f,
                    "Question {} does not have exactly one correct answer",
                    question_id
                )
            }
            GradingError::QuestionNotFound { question_number } => {
                write!(f, "Question number {} is out of range", question_number)
            }
        }
    }
}

impl std::error::Error for GradingError {}

/// One graded row, mirroring the exam's question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerQuestion {
    /// 1-based position in the exam (the answer-sheet question number).
    pub question_number: usize,
    pub question_id: i64,
    /// Normalized selection; empty string means blank/unrecognized.
    pub selected_code: String,
    pub correct_code: String,
    pub is_correct: bool,
}

/// The full grading outcome for one submission against one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub per_question: Vec<PerQuestion>,
    pub correct_count: usize,
    /// `correct_count / total * 10`, full precision. Rounding is a
    /// presentation concern.
    pub raw_score: f64,
    pub band: Band,
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Finds the single correct answer code for a question.
fn answer_key(question: &Question) -> Result<&str, GradingError> {
    let mut correct = question.answers.iter().filter(|a| a.is_correct);
    match (correct.next(), correct.next()) {
        (Some(answer), None) => Ok(&answer.code),
        _ => Err(GradingError::MissingAnswerKey {
            question_id: question.id,
        }),
    }
}

/// Aggregates are always rederived from the detail rows, never patched
/// incrementally, so the stored score can not drift from the per-question
/// record.
fn finalize(per_question: Vec<PerQuestion>) -> GradingResult {
    let correct_count = per_question.iter().filter(|p| p.is_correct).count();
    let raw_score = correct_count as f64 / per_question.len() as f64 * 10.0;

    GradingResult {
        correct_count,
        raw_score,
        band: Band::from_score(raw_score),
        per_question,
    }
}

/// Grades one submission against the exam's answer key.
///
/// * Exam order defines the 1-based question number.
/// * Codes are compared trimmed and case-insensitively.
/// * A question missing from `answers` is graded as blank, which counts as
///   wrong and stays in the denominator.
pub fn grade(
    questions: &[Question],
    answers: &HashMap<i64, String>,
) -> Result<GradingResult, GradingError> {
    if questions.is_empty() {
        return Err(GradingError::EmptyExam);
    }

    let mut per_question = Vec::with_capacity(questions.len());

    for (idx, question) in questions.iter().enumerate() {
        let correct_code = normalize(answer_key(question)?);
        let selected_code = answers
            .get(&question.id)
            .map(|code| normalize(code))
            .unwrap_or_default();
        let is_correct = !selected_code.is_empty() && selected_code == correct_code;

        per_question.push(PerQuestion {
            question_number: idx + 1,
            question_id: question.id,
            selected_code,
            correct_code,
            is_correct,
        });
    }

    Ok(finalize(per_question))
}

/// Replaces the recorded selection for one question (reviewer correction of
/// an OCR misread) and recomputes the aggregates from the full sequence.
pub fn apply_override(
    result: &GradingResult,
    question_number: usize,
    new_code: &str,
) -> Result<GradingResult, GradingError> {
    if question_number == 0 || question_number > result.per_question.len() {
        return Err(GradingError::QuestionNotFound { question_number });
    }

    let mut per_question = result.per_question.clone();
    let entry = &mut per_question[question_number - 1];
    entry.selected_code = normalize(new_code);
    entry.is_correct = !entry.selected_code.is_empty() && entry.selected_code == entry.correct_code;

    Ok(finalize(per_question))
}

/// One histogram bucket of the fixed score distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub range: String,
    pub count: usize,
}

/// Class-level statistics over the raw scores of one exam's submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub count: usize,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub distribution: Vec<DistributionBucket>,
}

const BUCKET_RANGES: [&str; 5] = ["0-5", "5-6.5", "6.5-8", "8-9", "9-10"];

fn bucket_index(score: f64) -> usize {
    if score < 5.0 {
        0
    } else if score < 6.5 {
        1
    } else if score < 8.0 {
        2
    } else if score < 9.0 {
        3
    } else {
        4
    }
}

/// Pure reduction over a list of raw scores.
///
/// An exam with no submissions yet is a normal, displayable state: zero
/// scores yield all-zero aggregates, never NaN or an error.
pub fn aggregate(scores: &[f64]) -> ScoreStatistics {
    let mut buckets = [0usize; 5];
    for &score in scores {
        buckets[bucket_index(score)] += 1;
    }

    let distribution = BUCKET_RANGES
        .iter()
        .zip(buckets)
        .map(|(range, count)| DistributionBucket {
            range: range.to_string(),
            count,
        })
        .collect();

    if scores.is_empty() {
        return ScoreStatistics {
            count: 0,
            average: 0.0,
            max: 0.0,
            min: 0.0,
            distribution,
        };
    }

    let count = scores.len();
    let sum: f64 = scores.iter().sum();
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);

    ScoreStatistics {
        count,
        average: sum / count as f64,
        max,
        min,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{Answer, Difficulty};

    fn answer(code: &str, is_correct: bool) -> Answer {
        Answer {
            code: code.to_string(),
            content: format!("Option {}", code),
            is_correct,
        }
    }

    fn question(id: i64, correct: &str) -> Question {
        Question {
            id,
            topic_id: 1,
            level: Difficulty::Easy,
            content: format!("Question {}", id),
            analysis: None,
            answers: ["A", "B", "C", "D"]
                .iter()
                .map(|c| answer(c, *c == correct))
                .collect(),
            created_at: None,
        }
    }

    /// The four-question exam used by most scenarios: keys B, A, D, C.
    fn exam_questions() -> Vec<Question> {
        vec![
            question(1, "B"),
            question(2, "A"),
            question(3, "D"),
            question(4, "C"),
        ]
    }

    fn answers(pairs: &[(i64, &str)]) -> HashMap<i64, String> {
        pairs
            .iter()
            .map(|(id, code)| (*id, code.to_string()))
            .collect()
    }

    #[test]
    fn perfect_submission_scores_ten() {
        let questions = exam_questions();
        let submitted = answers(&[(1, "B"), (2, "A"), (3, "D"), (4, "C")]);

        let result = grade(&questions, &submitted).unwrap();
        assert_eq!(result.correct_count, 4);
        assert_eq!(result.raw_score, 10.0);
        assert_eq!(result.band, Band::Excellent);
    }

    #[test]
    fn half_correct_submission_is_average() {
        let questions = exam_questions();
        let submitted = answers(&[(1, "B"), (2, "X"), (3, "D"), (4, "A")]);

        let result = grade(&questions, &submitted).unwrap();
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.raw_score, 5.0);
        assert_eq!(result.band, Band::Average);
    }

    #[test]
    fn empty_submission_scores_zero() {
        let questions = exam_questions();

        let result = grade(&questions, &HashMap::new()).unwrap();
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.raw_score, 0.0);
        assert_eq!(result.band, Band::Weak);
        // Blanks are recorded, not skipped.
        assert_eq!(result.per_question.len(), 4);
        assert!(result.per_question.iter().all(|p| p.selected_code.is_empty()));
    }

    #[test]
    fn comparison_is_trimmed_and_case_insensitive() {
        let questions = vec![question(1, "B")];
        let submitted = answers(&[(1, " b ")]);

        let result = grade(&questions, &submitted).unwrap();
        assert!(result.per_question[0].is_correct);
        assert_eq!(result.per_question[0].selected_code, "B");
    }

    #[test]
    fn grading_is_deterministic() {
        let questions = exam_questions();
        let submitted = answers(&[(1, "B"), (3, "A")]);

        let first = grade(&questions, &submitted).unwrap();
        let second = grade(&questions, &submitted).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_exam_is_rejected() {
        let err = grade(&[], &HashMap::new()).unwrap_err();
        assert_eq!(err, GradingError::EmptyExam);
    }

    #[test]
    fn question_without_correct_answer_is_rejected() {
        let mut questions = exam_questions();
        for a in &mut questions[2].answers {
            a.is_correct = false;
        }

        let err = grade(&questions, &HashMap::new()).unwrap_err();
        assert_eq!(err, GradingError::MissingAnswerKey { question_id: 3 });
    }

    #[test]
    fn question_with_two_correct_answers_is_rejected() {
        let mut questions = exam_questions();
        questions[1].answers[2].is_correct = true;

        let err = grade(&questions, &HashMap::new()).unwrap_err();
        assert_eq!(err, GradingError::MissingAnswerKey { question_id: 2 });
    }

    #[test]
    fn override_recomputes_score_and_band() {
        let questions = exam_questions();
        let submitted = answers(&[(1, "B"), (2, "X"), (3, "D"), (4, "A")]);
        let result = grade(&questions, &submitted).unwrap();
        assert_eq!(result.raw_score, 5.0);

        let fixed = apply_override(&result, 2, "A").unwrap();
        assert_eq!(fixed.per_question[1].selected_code, "A");
        assert!(fixed.per_question[1].is_correct);
        assert_eq!(fixed.correct_count, 3);
        assert_eq!(fixed.raw_score, 7.5);
        assert_eq!(fixed.band, Band::Good);

        // The input result is untouched.
        assert_eq!(result.raw_score, 5.0);
        assert_eq!(result.per_question[1].selected_code, "X");
    }

    #[test]
    fn override_out_of_range_fails() {
        let questions = exam_questions();
        let result = grade(&questions, &HashMap::new()).unwrap();

        assert_eq!(
            apply_override(&result, 0, "A").unwrap_err(),
            GradingError::QuestionNotFound { question_number: 0 }
        );
        assert_eq!(
            apply_override(&result, 5, "A").unwrap_err(),
            GradingError::QuestionNotFound { question_number: 5 }
        );
    }

    #[test]
    fn bands_partition_the_score_range() {
        assert_eq!(Band::from_score(0.0), Band::Weak);
        assert_eq!(Band::from_score(4.999), Band::Weak);
        assert_eq!(Band::from_score(5.0), Band::Average);
        assert_eq!(Band::from_score(6.499), Band::Average);
        assert_eq!(Band::from_score(6.5), Band::Good);
        assert_eq!(Band::from_score(7.999), Band::Good);
        assert_eq!(Band::from_score(8.0), Band::Excellent);
        assert_eq!(Band::from_score(10.0), Band::Excellent);
    }

    #[test]
    fn score_stays_within_bounds() {
        let questions = exam_questions();
        for submitted in [
            answers(&[]),
            answers(&[(1, "B")]),
            answers(&[(1, "B"), (2, "A"), (3, "D"), (4, "C")]),
        ] {
            let result = grade(&questions, &submitted).unwrap();
            assert!(result.raw_score >= 0.0 && result.raw_score <= 10.0);
        }
    }

    #[test]
    fn aggregate_of_nothing_is_all_zero() {
        let stats = aggregate(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.min, 0.0);
        assert!(stats.distribution.iter().all(|b| b.count == 0));
        assert_eq!(stats.distribution.len(), 5);
    }

    #[test]
    fn aggregate_computes_summary_and_histogram() {
        let stats = aggregate(&[10.0, 7.5, 5.0, 2.5, 9.0, 8.0]);
        assert_eq!(stats.count, 6);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.min, 2.5);
        assert!((stats.average - 7.0).abs() < 1e-9);

        let counts: Vec<usize> = stats.distribution.iter().map(|b| b.count).collect();
        // [0,5) [5,6.5) [6.5,8) [8,9) [9,10]
        assert_eq!(counts, vec![1, 1, 1, 1, 2]);
    }
}
