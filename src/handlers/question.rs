// src/handlers/question.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        common::ListResponse,
        question::{Answer, CreateQuestionRequest, Difficulty},
    },
    store::{NewQuestion, QuestionFilter, Store},
    utils::html::clean_html,
};

/// Query parameters for listing questions.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub topic_id: Option<i64>,
    pub level: Option<Difficulty>,
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Lists question bank entries, optionally filtered by topic, difficulty and
/// content keyword. With a `page` parameter the response is the paginated
/// envelope, otherwise a plain array.
pub async fn list_questions(
    State(store): State<Arc<dyn Store>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = QuestionFilter {
        topic_id: params.topic_id,
        level: params.level,
        q: params.q,
    };

    let questions = store.list_questions(&filter).await;

    Ok(Json(ListResponse::paginate(
        questions,
        params.page,
        params.per_page,
    )))
}

/// Retrieves a single question by ID.
pub async fn get_question(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = store
        .get_question(id)
        .await
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Turns a validated authoring payload into store fields: rich text is
/// sanitized and answer codes are canonicalized to uppercase.
fn sanitized_fields(payload: CreateQuestionRequest) -> NewQuestion {
    NewQuestion {
        topic_id: payload.topic_id,
        level: payload.level,
        content: clean_html(&payload.content),
        analysis: payload.analysis.map(|a| clean_html(&a)),
        answers: payload
            .answers
            .into_iter()
            .map(|a| Answer {
                code: a.code.trim().to_ascii_uppercase(),
                content: clean_html(&a.content),
                is_correct: a.is_correct,
            })
            .collect(),
    }
}

/// Creates a question bank entry.
pub async fn create_question(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !store.topic_ids().await.contains(&payload.topic_id) {
        return Err(AppError::BadRequest(format!(
            "Topic {} does not exist",
            payload.topic_id
        )));
    }

    let question = store.insert_question(sanitized_fields(payload)).await;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Replaces a question bank entry.
pub async fn update_question(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !store.topic_ids().await.contains(&payload.topic_id) {
        return Err(AppError::BadRequest(format!(
            "Topic {} does not exist",
            payload.topic_id
        )));
    }

    let question = store
        .update_question(id, sanitized_fields(payload))
        .await
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Deletes a question bank entry. Already-generated exams keep their own
/// copy of the question, so existing answer sheets still grade.
pub async fn delete_question(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_question(id).await {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
