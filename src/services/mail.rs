//! Outbound mail seam.
//!
//! The service only needs to know whether delivery failed because the
//! transport rejected its credentials; that case is surfaced to the user by
//! `middleware::rescue`. SMTP itself is not configured here: the shipped
//! `LogMailer` records the message through `tracing`.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport authentication failed: {0}")]
    Authentication(String),
    #[error("mail transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "mail delivered (log only)");
        Ok(())
    }
}

/// Process-wide default for links in outgoing mail (`host[:port]`).
///
/// Updated from the request's `Host` header on every request.
#[derive(Debug, Clone, Default)]
pub struct MailDefaults {
    host: Arc<RwLock<Option<String>>>,
}

impl MailDefaults {
    pub fn set_host(&self, host: &str) {
        let mut current = self.host.write().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() != Some(host) {
            *current = Some(host.to_string());
        }
    }

    pub fn host(&self) -> Option<String> {
        self.host
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Absolute `http://` URL for `path` on the current default host.
    pub fn url_for(&self, path: &str) -> Option<String> {
        self.host().map(|host| format!("http://{host}{path}"))
    }
}
