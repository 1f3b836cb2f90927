/*!
 * Request-scoped values published by the bootstrap middleware
 *
 * Responsibility:
 * - bootstrap が request extensions に入れた値 (Identity / Settings / RequestContext /
 *   ArchiveConfig) を handler に提供する
 * - 見つからない場合は bootstrap 未適用の配線ミスなので 500
 */

mod core;

pub use core::{CurrentArchive, CurrentContext, CurrentIdentity, CurrentSettings};
