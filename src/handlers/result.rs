// src/handlers/result.rs

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    grading,
    models::submission::{OverrideRequest, SubmitExamRequest},
    store::Store,
};

/// Grades a submission against the stored exam's answer key and persists the
/// outcome.
///
/// The answer list is what OCR (or manual entry) produced; it may be empty
/// or partial, and missing questions grade as blank. Integrity failures in
/// the exam data (no unique correct answer) block the save with a 422.
pub async fn submit_result(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let exam = store
        .get_exam(payload.exam_id)
        .await
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let answers: HashMap<i64, String> = payload
        .answers
        .into_iter()
        .map(|a| (a.question_id, a.selected_code))
        .collect();

    let graded = grading::grade(&exam.questions, &answers)?;

    tracing::info!(
        "Graded exam {} for student {}: {}/{} correct",
        exam.code,
        payload.student_id,
        graded.correct_count,
        graded.per_question.len()
    );

    let result = store
        .insert_result(exam.id, payload.student_id, graded)
        .await;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Reviewer correction of one graded row (an OCR misread bubble).
///
/// Replaces the recorded selection for the given 1-based question number and
/// rederives the score and band from the full per-question detail.
pub async fn override_result(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
    Json(payload): Json<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = store
        .get_result(id)
        .await
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    let updated = grading::apply_override(
        &result.grading,
        payload.question_number,
        &payload.selected_code,
    )?;

    let result = store
        .update_result(id, updated)
        .await
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    Ok(Json(result))
}
