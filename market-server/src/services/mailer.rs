//! Outbound mail
//!
//! Account mail (registration verification, order confirmations) goes
//! through the [`Mailer`] trait. The default implementation writes to the
//! log; a failed mail never fails the request that triggered it, callers
//! treat delivery as best effort.

use async_trait::async_trait;
use shared::AppResult;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Log-backed mailer, the default for development and tests
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        tracing::info!(to, subject, body, "Mail dispatched to log");
        Ok(())
    }
}

/// Captures sent mail for assertions in tests
#[derive(Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}
