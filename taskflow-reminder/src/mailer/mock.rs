/// Recording mock transport for tests
///
/// Captures every sent email and can be told to fail for specific
/// recipients, which is how the scheduler's failure-isolation tests
/// work.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use super::{DigestEmail, Mailer, MailerError};

/// Mock implementation of [`Mailer`]
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<DigestEmail>>,
    failing: Mutex<HashSet<String>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send to `address` fail
    pub fn fail_for(&self, address: &str) {
        self.failing
            .lock()
            .expect("mock mailer lock poisoned")
            .insert(address.to_string());
    }

    /// Everything delivered so far
    pub fn sent(&self) -> Vec<DigestEmail> {
        self.sent
            .lock()
            .expect("mock mailer lock poisoned")
            .clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, email: &DigestEmail) -> Result<(), MailerError> {
        let failing = self
            .failing
            .lock()
            .expect("mock mailer lock poisoned")
            .contains(&email.to);

        if failing {
            return Err(MailerError::Transport(format!(
                "mock failure for {}",
                email.to
            )));
        }

        self.sent
            .lock()
            .expect("mock mailer lock poisoned")
            .push(email.clone());
        Ok(())
    }
}
