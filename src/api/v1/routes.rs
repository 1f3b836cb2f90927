/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証/認可は route ごとの layer ではなく、bootstrap middleware と handler 内の Ability で行う
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    archive::get_archive,
    health::health,
    me::me,
    notifications::send_test,
    settings::{get_instrument, get_profile, get_site},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/profile", get(get_profile))
        .route("/site", get(get_site))
        .route("/instrument", get(get_instrument))
        .route("/archive", get(get_archive))
        .route("/notifications/test", post(send_test))
}
