/*
 * Responsibility
 * - GET /health (疎通用)
 * - bootstrap を通るので、seeding と archive config の読み込みが成功していることも確認できる
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
