/*
 * Responsibility
 * - request bootstrap が使うドメインサービス群
 * - HTTP (axum) には依存しない。middleware / handlers から呼ばれる
 */
pub mod archive;
pub mod auth;
pub mod build_info;
pub mod mail;
pub mod settings;
