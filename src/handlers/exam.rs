// src/handlers/exam.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rand::seq::SliceRandom;

use crate::{
    error::AppError,
    examspec,
    grading,
    models::exam::{ExamSummary, GenerateExamRequest, RenderedExam},
    store::{NewExam, Store},
};

/// Assembles a new exam from the question bank.
///
/// Runs the specification through the validation pipeline, draws the
/// requested number of questions per difficulty tier, shuffles the overall
/// order and each question's answer order, and stores the result under a
/// short display code. A tier that cannot be filled is an explicit failure,
/// not a silently smaller exam.
pub async fn generate_exam(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<GenerateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let known_topics = store.topic_ids().await;
    let spec = examspec::validate(&payload, &known_topics)?;
    let request = spec.to_generation_request();

    let mut questions = Vec::new();
    for (level, count) in &request.counts {
        if *count == 0 {
            continue;
        }
        let drawn = store
            .sample_questions(request.topic_id, *level, *count)
            .await;
        if drawn.len() < *count {
            return Err(AppError::Conflict(format!(
                "Not enough {} questions in topic {}: requested {}, available {}",
                level.as_str(),
                request.topic_id,
                count,
                drawn.len()
            )));
        }
        questions.extend(drawn);
    }

    // The stored order *is* the answer-sheet order; shuffling here fixes the
    // question numbers and option letters for the life of the exam. The rng
    // must not live across an await point.
    {
        let mut rng = rand::thread_rng();
        questions.shuffle(&mut rng);
        for question in &mut questions {
            question.answers.shuffle(&mut rng);
        }
    }

    let code = uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase();

    let exam = store
        .insert_exam(NewExam {
            code,
            name: spec.exam_name.clone(),
            topic_id: request.topic_id,
            duration_minutes: request.duration_minutes,
            questions,
        })
        .await;

    tracing::info!("Generated exam {} ({} questions)", exam.code, exam.questions.len());

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Lists all exams as summary rows.
pub async fn list_exams(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    let exams = store.list_exams().await;
    let summaries: Vec<ExamSummary> = exams.iter().map(ExamSummary::from).collect();

    Ok(Json(summaries))
}

/// Retrieves one exam with its full question list and answer key.
/// This surface is teacher-facing; the student rendering is `render_exam`.
pub async fn get_exam(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = store
        .get_exam(id)
        .await
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(exam))
}

/// Deletes an exam and its stored results.
pub async fn delete_exam(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_exam(id).await {
        return Err(AppError::NotFound("Exam not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Renders an exam by display code with the correct flags stripped.
pub async fn render_exam(
    State(store): State<Arc<dyn Store>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exam = store
        .get_exam_by_code(&code)
        .await
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(RenderedExam::from(&exam)))
}

/// Lists all stored results for one exam.
pub async fn exam_results(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    store
        .get_exam(id)
        .await
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(store.list_results(id).await))
}

/// Class-level statistics over one exam's results. An exam with no
/// submissions yet reports zeroed aggregates.
pub async fn exam_statistics(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    store
        .get_exam(id)
        .await
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let results = store.list_results(id).await;
    let scores: Vec<f64> = results.iter().map(|r| r.grading.raw_score).collect();
    let stats = grading::aggregate(&scores);

    Ok(Json(serde_json::json!({
        "exam_id": id,
        "total_students": stats.count,
        "average_score": stats.average,
        "max_score": stats.max,
        "min_score": stats.min,
        "score_distribution": stats.distribution,
    })))
}
