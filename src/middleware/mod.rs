/*
 * Responsibility
 * - middleware の公開インターフェース
 * - bootstrap: 全 action の前処理 (seeding / identity / archive config)
 * - rescue: AccessDenied / mail 認証失敗の境界での変換
 * - format_suffix: routing 前に `.csv` などの拡張子を外して format として記録
 * - http: request id / trace / body limit / timeout
 * - cors: 最外周で Access-Control-Allow-Origin: * を付与
 */
pub mod bootstrap;
pub mod cors;
pub mod format_suffix;
pub mod http;
pub mod rescue;
