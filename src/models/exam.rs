// src/models/exam.rs

use serde::{Deserialize, Serialize};

use crate::models::question::{Question, RenderedQuestion};

/// An assembled exam. `questions` is the presentation / answer-sheet order;
/// position determines the 1-based question number used for OCR alignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    /// Short display code printed on the answer sheet.
    pub code: String,
    pub name: String,
    pub topic_id: i64,
    pub duration_minutes: u32,
    pub questions: Vec<Question>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Listing row for the exam overview table.
#[derive(Debug, Clone, Serialize)]
pub struct ExamSummary {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub topic_id: i64,
    pub duration_minutes: u32,
    pub total_questions: usize,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&Exam> for ExamSummary {
    fn from(exam: &Exam) -> Self {
        ExamSummary {
            id: exam.id,
            code: exam.code.clone(),
            name: exam.name.clone(),
            topic_id: exam.topic_id,
            duration_minutes: exam.duration_minutes,
            total_questions: exam.questions.len(),
            created_at: exam.created_at,
        }
    }
}

/// Raw exam-creation form as the wizard submits it. All fields default so a
/// sparse payload reaches the validation pipeline instead of failing to
/// deserialize; the pipeline reports the first violated constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateExamRequest {
    #[serde(default)]
    pub exam_name: String,
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub easy: i64,
    #[serde(default)]
    pub medium: i64,
    #[serde(default)]
    pub hard: i64,
}

/// Student-facing exam rendering: question order preserved, correct flags
/// stripped.
#[derive(Debug, Serialize)]
pub struct RenderedExam {
    pub exam_id: i64,
    pub code: String,
    pub name: String,
    pub duration_minutes: u32,
    pub questions: Vec<RenderedQuestion>,
}

impl From<&Exam> for RenderedExam {
    fn from(exam: &Exam) -> Self {
        RenderedExam {
            exam_id: exam.id,
            code: exam.code.clone(),
            name: exam.name.clone(),
            duration_minutes: exam.duration_minutes,
            questions: exam.questions.iter().map(RenderedQuestion::from).collect(),
        }
    }
}
