use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use std::sync::{Arc, Mutex};

use crate::{config::AppConfig, error::ApiError};

/// EmailService
///
/// Contract for the confirmation-code delivery channel. Delivery failures
/// must propagate to the caller; a swallowed error would leave a registered
/// user with no way to obtain their code.
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send_confirmation_code(
        &self,
        to: &str,
        username: &str,
        code: &str,
    ) -> Result<(), ApiError>;
}

/// Shared handle used in the application state.
pub type EmailState = Arc<dyn EmailService>;

/// SmtpEmailService
///
/// Production transport: async SMTP via STARTTLS with relay credentials from
/// the configuration.
#[derive(Clone)]
pub struct SmtpEmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
}

impl SmtpEmailService {
    /// Builds the transport from configuration. Requires `config.has_smtp()`.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let host = config
            .smtp_host
            .as_ref()
            .ok_or_else(|| ApiError::Internal("SMTP_HOST is required".to_string()))?;
        let username = config
            .smtp_username
            .as_ref()
            .ok_or_else(|| ApiError::Internal("SMTP_USERNAME is required".to_string()))?;
        let password = config
            .smtp_password
            .as_ref()
            .ok_or_else(|| ApiError::Internal("SMTP_PASSWORD is required".to_string()))?;

        let from_address: Mailbox = config
            .admin_email
            .parse()
            .map_err(|_| ApiError::Internal("ADMIN_EMAIL is not a valid address".to_string()))?;

        let creds = Credentials::new(username.clone(), password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| ApiError::Internal(format!("failed to create SMTP transport: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from_address,
        })
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_confirmation_code(
        &self,
        to: &str,
        username: &str,
        code: &str,
    ) -> Result<(), ApiError> {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|_| ApiError::Validation("invalid recipient email address".to_string()))?;

        let body = format!(
            "Hello {username},\n\
             \n\
             Your confirmation code: {code}\n\
             \n\
             Exchange it together with your username at the token endpoint\n\
             to obtain an access token.\n"
        );

        let email = Message::builder()
            .from(self.from_address.clone())
            .to(to_mailbox)
            .subject("Your confirmation code")
            .body(body)
            .map_err(|e| ApiError::Internal(format!("failed to build email message: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| ApiError::EmailDelivery(e.to_string()))?;

        Ok(())
    }
}

/// LogEmailService
///
/// Fallback channel for local runs without an SMTP relay: the code is written
/// to the log instead of an inbox. Never used in production.
pub struct LogEmailService;

#[async_trait]
impl EmailService for LogEmailService {
    async fn send_confirmation_code(
        &self,
        to: &str,
        username: &str,
        code: &str,
    ) -> Result<(), ApiError> {
        tracing::info!(%to, %username, %code, "confirmation code (SMTP not configured)");
        Ok(())
    }
}

/// MockEmailService
///
/// Test double that records every send and can simulate channel failure.
#[derive(Default)]
pub struct MockEmailService {
    pub should_fail: bool,
    pub sent: Mutex<Vec<SentEmail>>,
}

/// A recorded outbound message.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub username: String,
    pub code: String,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_confirmation_code(
        &self,
        to: &str,
        username: &str,
        code: &str,
    ) -> Result<(), ApiError> {
        if self.should_fail {
            return Err(ApiError::EmailDelivery(
                "mock email channel failure".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            username: username.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Config with all SMTP fields populated; no network is touched because
    /// the transport connects lazily.
    fn smtp_test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.smtp_host = Some("localhost".into());
        config.smtp_username = Some("testuser".into());
        config.smtp_password = Some("testpass".into());
        config
    }

    #[test]
    fn new_succeeds_with_full_smtp_config() {
        let config = smtp_test_config();
        assert!(SmtpEmailService::new(&config).is_ok());
    }

    #[test]
    fn new_fails_without_host() {
        let mut config = smtp_test_config();
        config.smtp_host = None;
        assert!(matches!(
            SmtpEmailService::new(&config),
            Err(ApiError::Internal(_))
        ));
    }

    #[test]
    fn new_fails_with_invalid_sender_address() {
        let mut config = smtp_test_config();
        config.admin_email = "not-an-email".into();
        assert!(matches!(
            SmtpEmailService::new(&config),
            Err(ApiError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn mock_records_sends_and_can_fail() {
        let mock = MockEmailService::new();
        mock.send_confirmation_code("a@b.c", "alice", "code123")
            .await
            .unwrap();
        let sent = mock.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].code, "code123");
        drop(sent);

        let failing = MockEmailService::new_failing();
        let result = failing.send_confirmation_code("a@b.c", "alice", "x").await;
        assert!(matches!(result, Err(ApiError::EmailDelivery(_))));
    }
}
