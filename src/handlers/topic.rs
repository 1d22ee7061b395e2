// src/handlers/topic.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{error::AppError, models::topic::CreateTopicRequest, store::Store};

/// Lists the topic catalog.
pub async fn list_topics(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_topics().await))
}

/// Creates a new topic pool.
pub async fn create_topic(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<CreateTopicRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let topic = store.insert_topic(payload.name, payload.subject).await;

    Ok((StatusCode::CREATED, Json(topic)))
}

/// Deletes a topic. Questions that referenced it stay in the bank but can no
/// longer be drawn into new exams.
pub async fn delete_topic(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_topic(id).await {
        return Err(AppError::NotFound("Topic not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
