// src/models/question.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Difficulty tier of a question, also used to specify how many questions of
/// each tier an assembled exam draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Wire/display form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Single letter, unique within the question (A / B / C / D).
    pub code: String,
    pub content: String,
    /// Exactly one answer per question carries this flag.
    pub is_correct: bool,
}

/// A question bank entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub topic_id: i64,
    pub level: Difficulty,
    /// Rich text (sanitized HTML), opaque to the grading logic.
    pub content: String,
    /// Explanation of the correct answer.
    pub analysis: Option<String>,
    pub answers: Vec<Answer>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Answer option as submitted by the authoring form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerInput {
    pub code: String,
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// DTO for creating or replacing a question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub topic_id: i64,
    pub level: Difficulty,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[validate(length(max = 5000))]
    pub analysis: Option<String>,
    #[validate(custom(function = validate_answers))]
    pub answers: Vec<AnswerInput>,
}

fn validate_answers(answers: &[AnswerInput]) -> Result<(), validator::ValidationError> {
    if answers.len() < 2 || answers.len() > 6 {
        return Err(validator::ValidationError::new("answer_count_out_of_range"));
    }

    let mut seen = HashSet::new();
    let mut correct_count = 0;

    for answer in answers {
        let code = answer.code.trim().to_ascii_uppercase();
        if code.len() != 1 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(validator::ValidationError::new("answer_code_not_a_letter"));
        }
        if !seen.insert(code) {
            return Err(validator::ValidationError::new("duplicate_answer_code"));
        }
        if answer.content.trim().is_empty() {
            return Err(validator::ValidationError::new("answer_content_empty"));
        }
        if answer.is_correct {
            correct_count += 1;
        }
    }

    // The single-correct-answer invariant is a data rule, not a UI rule;
    // the grading engine re-checks it defensively on every grade call.
    if correct_count != 1 {
        return Err(validator::ValidationError::new("exactly_one_correct_answer"));
    }

    Ok(())
}

/// DTO for the student-facing rendering: the correct flag is stripped.
#[derive(Debug, Serialize)]
pub struct RenderedAnswer {
    pub code: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RenderedQuestion {
    pub id: i64,
    pub content: String,
    pub answers: Vec<RenderedAnswer>,
}

impl From<&Question> for RenderedQuestion {
    fn from(question: &Question) -> Self {
        RenderedQuestion {
            id: question.id,
            content: question.content.clone(),
            answers: question
                .answers
                .iter()
                .map(|a| RenderedAnswer {
                    code: a.code.clone(),
                    content: a.content.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(codes: &[(&str, bool)]) -> Vec<AnswerInput> {
        codes
            .iter()
            .map(|(code, is_correct)| AnswerInput {
                code: code.to_string(),
                content: format!("Option {}", code),
                is_correct: *is_correct,
            })
            .collect()
    }

    #[test]
    fn four_options_one_correct_is_valid() {
        let answers = input(&[("A", false), ("B", true), ("C", false), ("D", false)]);
        assert!(validate_answers(&answers).is_ok());
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let answers = input(&[("A", true), ("a", false)]);
        assert_eq!(
            validate_answers(&answers).unwrap_err().code,
            "duplicate_answer_code"
        );
    }

    #[test]
    fn zero_or_two_correct_answers_are_rejected() {
        let none = input(&[("A", false), ("B", false)]);
        let two = input(&[("A", true), ("B", true)]);
        for answers in [none, two] {
            assert_eq!(
                validate_answers(&answers).unwrap_err().code,
                "exactly_one_correct_answer"
            );
        }
    }

    #[test]
    fn multi_character_code_is_rejected() {
        let answers = input(&[("AB", true), ("C", false)]);
        assert_eq!(
            validate_answers(&answers).unwrap_err().code,
            "answer_code_not_a_letter"
        );
    }
}
