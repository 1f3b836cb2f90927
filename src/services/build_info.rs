/*
 * Responsibility
 * - リクエストごとの表示用メタデータ (release / revision / branch / build time / kernel / uptime)
 * - 値は毎回環境変数から読み直す。未設定は "unknown"
 */
use std::time::Duration;

use serde::Serialize;

use crate::config::AppEnv;

pub const UNKNOWN: &str = "unknown";

/// Source revisions are displayed abbreviated to this many characters.
pub const REVISION_DISPLAY_LEN: usize = 7;

pub const RELEASE_VAR: &str = "PORTAL_RELEASE";
pub const GIT_SHA_VAR: &str = "PORTAL_GIT_SHA";
pub const GIT_BRANCH_VAR: &str = "PORTAL_GIT_BRANCH";
pub const BUILD_TIME_VAR: &str = "PORTAL_BUILD_TIME";
pub const KERNEL_RELEASE_VAR: &str = "PORTAL_KERNEL_RELEASE";
pub const KERNEL_VERSION_VAR: &str = "PORTAL_KERNEL_VERSION";
pub const MACHINE_VAR: &str = "PORTAL_MACHINE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestContext {
    pub release: String,
    pub source_revision: String,
    pub source_branch: String,
    pub build_time: String,
    pub kernel_release: String,
    pub kernel_version: String,
    pub machine: String,
    pub app_env: &'static str,
    pub version: &'static str,
    pub system_uptime_seconds: Option<f64>,
    pub server_uptime_seconds: u64,
}

impl RequestContext {
    pub async fn from_env(app_env: AppEnv, server_uptime: Duration) -> Self {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            app_env,
            server_uptime,
            system_uptime_seconds().await,
        )
    }

    pub fn from_lookup<F>(
        lookup: F,
        app_env: AppEnv,
        server_uptime: Duration,
        system_uptime_seconds: Option<f64>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str| lookup(key).unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            release: fetch(RELEASE_VAR),
            source_revision: abbreviate_revision(&fetch(GIT_SHA_VAR)),
            source_branch: fetch(GIT_BRANCH_VAR),
            build_time: fetch(BUILD_TIME_VAR),
            kernel_release: fetch(KERNEL_RELEASE_VAR),
            kernel_version: fetch(KERNEL_VERSION_VAR),
            machine: fetch(MACHINE_VAR),
            app_env: app_env.as_str(),
            version: env!("CARGO_PKG_VERSION"),
            system_uptime_seconds,
            server_uptime_seconds: server_uptime.as_secs(),
        }
    }
}

/// First `REVISION_DISPLAY_LEN` characters; shorter values pass through.
pub fn abbreviate_revision(revision: &str) -> String {
    revision.chars().take(REVISION_DISPLAY_LEN).collect()
}

// Linux only; `None` elsewhere or when unreadable.
async fn system_uptime_seconds() -> Option<f64> {
    let raw = tokio::fs::read_to_string("/proc/uptime").await.ok()?;
    parse_uptime(&raw)
}

/// Seconds since boot from `/proc/uptime` (`"<up> <idle>"`).
fn parse_uptime(raw: &str) -> Option<f64> {
    raw.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn revision_is_abbreviated_to_seven_chars() {
        assert_eq!(abbreviate_revision("abcdef1234"), "abcdef1");
        assert_eq!(abbreviate_revision("abcdef1"), "abcdef1");
        assert_eq!(abbreviate_revision("abc"), "abc");
    }

    #[test]
    fn unset_values_default_to_unknown() {
        let ctx = RequestContext::from_lookup(
            |_| None,
            AppEnv::Development,
            Duration::from_secs(5),
            None,
        );
        assert_eq!(ctx.release, UNKNOWN);
        assert_eq!(ctx.source_revision, UNKNOWN);
        assert_eq!(ctx.machine, UNKNOWN);
        assert_eq!(ctx.app_env, "development");
        assert_eq!(ctx.server_uptime_seconds, 5);
    }

    #[test]
    fn set_values_are_used() {
        let env = HashMap::from([
            (GIT_SHA_VAR, "0123456789abcdef"),
            (GIT_BRANCH_VAR, "main"),
            (RELEASE_VAR, "1.4.2"),
        ]);
        let ctx = RequestContext::from_lookup(
            |key| env.get(key).map(|v| v.to_string()),
            AppEnv::Production,
            Duration::ZERO,
            Some(12.5),
        );
        assert_eq!(ctx.source_revision, "0123456");
        assert_eq!(ctx.source_branch, "main");
        assert_eq!(ctx.release, "1.4.2");
        assert_eq!(ctx.build_time, UNKNOWN);
        assert_eq!(ctx.system_uptime_seconds, Some(12.5));
    }

    #[test]
    fn uptime_is_the_first_proc_field() {
        assert_eq!(parse_uptime("3521.77 13880.41\n"), Some(3521.77));
        assert_eq!(parse_uptime(""), None);
        assert_eq!(parse_uptime("up idle"), None);
    }

    #[tokio::test]
    async fn from_env_reads_uptime_without_blocking_the_runtime() {
        let ctx = RequestContext::from_env(AppEnv::Development, Duration::from_secs(1)).await;
        assert_eq!(ctx.server_uptime_seconds, 1);
        if let Some(up) = ctx.system_uptime_seconds {
            assert!(up >= 0.0);
        }
    }
}
