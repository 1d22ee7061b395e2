// src/models/submission.rs

use serde::{Deserialize, Serialize};

use crate::grading::GradingResult;

/// One recognized or hand-entered answer. OCR produces the same shape; an
/// empty `selected_code` marks an unread bubble.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmit {
    pub question_id: i64,
    #[serde(default)]
    pub selected_code: String,
}

/// One test-taker's submission for one exam. The answer list may be empty or
/// partial (OCR recognized nothing / only some rows); missing questions are
/// graded as blank.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitExamRequest {
    pub exam_id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub answers: Vec<AnswerSubmit>,
}

/// Reviewer correction of a single graded row.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideRequest {
    pub question_number: usize,
    pub selected_code: String,
}

/// A persisted grading outcome. The grading detail is flattened so the JSON
/// carries `per_question`, `correct_count`, `raw_score` and `band` at the
/// top level.
#[derive(Debug, Clone, Serialize)]
pub struct StudentResult {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    #[serde(flatten)]
    pub grading: GradingResult,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
