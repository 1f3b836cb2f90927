//! Shared fixtures: in-memory stores and the router stack served in production.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use chrono::{DateTime, Duration, Utc};
use tempfile::NamedTempFile;
use tower::ServiceExt;
use uuid::Uuid;

use sensor_portal::app;
use sensor_portal::config::{AppEnv, HttpLimits};
use sensor_portal::repos::{
    InstrumentRecord, ProfileRecord, RepoError, RepoResult, SessionStore, SettingsRecord,
    SettingsStore, SettingsVariant, SiteRecord, UserRecord, UserStore,
};
use sensor_portal::services::archive::ArchiveConfigSource;
use sensor_portal::services::mail::{MailError, Mailer, OutgoingMail};
use sensor_portal::state::{AppState, Stores};

pub const DISABLED_ARCHIVE: &str = r#"
[archive]
name = "none"
enabled = false
"#;

/// Settings store honouring the one-row-per-variant rule.
#[derive(Default)]
pub struct MemorySettings {
    rows: Mutex<HashMap<SettingsVariant, SettingsRecord>>,
    pub writes: AtomicUsize,
    pub unavailable: AtomicBool,
}

impl MemorySettings {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn put(&self, record: SettingsRecord) {
        self.rows.lock().unwrap().insert(record.variant(), record);
    }

    pub fn profile(&self) -> Option<ProfileRecord> {
        match self.rows.lock().unwrap().get(&SettingsVariant::Profile) {
            Some(SettingsRecord::Profile(p)) => Some(p.clone()),
            _ => None,
        }
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

pub fn profile(secure_administration: bool, contact_email: Option<&str>) -> ProfileRecord {
    ProfileRecord {
        id: 1,
        project: ProfileRecord::DEFAULT_PROJECT.into(),
        affiliation: ProfileRecord::DEFAULT_AFFILIATION.into(),
        description: ProfileRecord::DEFAULT_DESCRIPTION.into(),
        contact_email: contact_email.map(String::from),
        logo: None,
        secure_administration,
    }
}

fn default_record(variant: SettingsVariant) -> SettingsRecord {
    match variant {
        SettingsVariant::Profile => SettingsRecord::Profile(profile(true, None)),
        SettingsVariant::Site => SettingsRecord::Site(SiteRecord {
            id: 1,
            name: SiteRecord::DEFAULT_NAME.into(),
            description: SiteRecord::DEFAULT_DESCRIPTION.into(),
            lat: 0.0,
            lon: 0.0,
            elevation: 0.0,
        }),
        SettingsVariant::Instrument => SettingsRecord::Instrument(InstrumentRecord {
            id: 1,
            name: InstrumentRecord::DEFAULT_NAME.into(),
            site_id: Some(1),
            sample_rate_seconds: InstrumentRecord::DEFAULT_SAMPLE_RATE_SECONDS,
            is_active: true,
        }),
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn first(&self, variant: SettingsVariant) -> RepoResult<Option<SettingsRecord>> {
        self.check_available()?;
        Ok(self.rows.lock().unwrap().get(&variant).cloned())
    }

    async fn initialize_default(&self, variant: SettingsVariant) -> RepoResult<()> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&variant) {
            return Err(RepoError::Conflict);
        }
        rows.insert(variant, default_record(variant));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    by_email: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryUsers {
    pub fn add(&self, email: &str, api_key: &str, roles: &[&str]) -> UserRecord {
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.into(),
            api_key: Some(api_key.into()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        };
        self.by_email
            .lock()
            .unwrap()
            .insert(user.email.clone(), user.clone());
        user
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self.by_email.lock().unwrap().get(email).cloned())
    }
}

struct MemorySession {
    user: UserRecord,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

/// Sessions with the same liveness rule as the SQL store: unrevoked and
/// `expires_at > now`.
#[derive(Default)]
pub struct MemorySessions {
    sessions: Mutex<HashMap<Uuid, MemorySession>>,
}

impl MemorySessions {
    pub fn open(&self, user: &UserRecord) -> Uuid {
        self.open_until(user, Utc::now() + Duration::hours(1))
    }

    pub fn open_until(&self, user: &UserRecord, expires_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.lock().unwrap().insert(
            id,
            MemorySession {
                user: user.clone(),
                expires_at,
                revoked: false,
            },
        );
        id
    }

    pub fn revoke(&self, session_id: Uuid) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(&session_id) {
            session.revoked = true;
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessions {
    async fn current_user(
        &self,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<UserRecord>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(&session_id)
            .filter(|s| !s.revoked && s.expires_at > now)
            .map(|s| s.user.clone()))
    }
}

pub enum MailOutcome {
    Deliver,
    RejectCredentials,
    Unreachable,
}

pub struct ScriptedMailer {
    outcome: MailOutcome,
    pub sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for ScriptedMailer {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        match self.outcome {
            MailOutcome::Deliver => {
                self.sent.lock().unwrap().push(mail.clone());
                Ok(())
            }
            MailOutcome::RejectCredentials => Err(MailError::Authentication(
                "535 5.7.8 authentication failed".into(),
            )),
            MailOutcome::Unreachable => Err(MailError::Transport("connection refused".into())),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub settings: Arc<MemorySettings>,
    pub users: Arc<MemoryUsers>,
    pub sessions: Arc<MemorySessions>,
    pub mailer: Arc<ScriptedMailer>,
    pub archive_file: NamedTempFile,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(MailOutcome::Deliver)
    }

    pub fn with_mailer(outcome: MailOutcome) -> Self {
        Self::build(outcome, HttpLimits::default())
    }

    pub fn with_limits(limits: HttpLimits) -> Self {
        Self::build(MailOutcome::Deliver, limits)
    }

    fn build(outcome: MailOutcome, limits: HttpLimits) -> Self {
        let settings = Arc::new(MemorySettings::default());
        let users = Arc::new(MemoryUsers::default());
        let sessions = Arc::new(MemorySessions::default());
        let mailer = Arc::new(ScriptedMailer {
            outcome,
            sent: Mutex::new(Vec::new()),
        });

        let mut archive_file = NamedTempFile::new().unwrap();
        archive_file
            .write_all(DISABLED_ARCHIVE.as_bytes())
            .unwrap();

        let state = AppState::new(
            Stores {
                settings: settings.clone(),
                users: users.clone(),
                sessions: sessions.clone(),
            },
            mailer.clone(),
            ArchiveConfigSource::new(archive_file.path()),
            "_session_id",
            AppEnv::Development,
        );

        Self {
            router: app::build_router(state, &limits),
            settings,
            users,
            sessions,
            mailer,
            archive_file,
        }
    }

    pub fn write_archive(&self, content: &str) {
        write_file(self.archive_file.path(), content);
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Decoded `alert` from a redirect to the about page.
pub fn redirect_alert(response: &Response<Body>) -> Option<String> {
    let location = response
        .headers()
        .get(axum::http::header::LOCATION)?
        .to_str()
        .ok()?;
    let (_, query) = location.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "alert")
        .map(|(_, v)| v.into_owned())
}
