// src/routes.rs

use axum::{
    Router, http::Method,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{exam, question, result, topic};
use crate::state::AppState;

/// Assembles the main application router.
///
/// * Merges all sub-routers (topics, questions, exams, results).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (the storage collaborator).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let topic_routes = Router::new()
        .route("/", get(topic::list_topics).post(topic::create_topic))
        .route("/{id}", delete(topic::delete_topic));

    let question_routes = Router::new()
        .route(
            "/",
            get(question::list_questions).post(question::create_question),
        )
        .route(
            "/{id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        );

    let exam_routes = Router::new()
        .route("/", get(exam::list_exams))
        .route("/generate", post(exam::generate_exam))
        .route("/{id}", get(exam::get_exam).delete(exam::delete_exam))
        .route("/{id}/results", get(exam::exam_results))
        .route("/{id}/statistics", get(exam::exam_statistics))
        .route("/code/{code}/render", get(exam::render_exam));

    let result_routes = Router::new()
        .route("/", post(result::submit_result))
        .route("/{id}/override", post(result::override_result));

    Router::new()
        .nest("/api/topics", topic_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
