/*
 * Responsibility
 * - HTTP 層: 応答形式の交渉 (format)、about ページ、/api/v1
 */
pub mod about;
pub mod format;
pub mod v1;
