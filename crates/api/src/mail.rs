//! Password reset delivery over SMTP.
//!
//! Only the reset flow sends mail. Without `SMTP_HOST` there is no
//! [`ResetMailer`] and the handler logs the link instead.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM: &str = "DevCamper <noreply@devcamper.local>";
const RESET_SUBJECT: &str = "Password reset token";

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build reset email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Sends reset links through a STARTTLS relay built once at start-up.
pub struct ResetMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl ResetMailer {
    pub fn new(transport: AsyncSmtpTransport<Tokio1Executor>, from: Mailbox) -> Self {
        Self { transport, from }
    }

    /// Build from the environment; `Ok(None)` when `SMTP_HOST` is unset.
    ///
    /// Reads `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_FROM` and, when both are
    /// present, `SMTP_USER`/`SMTP_PASSWORD`. A bad sender address or relay
    /// host is an error rather than a silently disabled mailer.
    pub fn from_env() -> Result<Option<Self>, MailError> {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);
        let from = std::env::var("SMTP_FROM")
            .unwrap_or_else(|_| DEFAULT_FROM.to_string())
            .parse()?;

        let mut relay = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?.port(port);
        if let (Ok(user), Ok(password)) = (std::env::var("SMTP_USER"), std::env::var("SMTP_PASSWORD")) {
            relay = relay.credentials(Credentials::new(user, password));
        }

        tracing::info!(smtp_host = %host, port, "SMTP delivery enabled");
        Ok(Some(Self::new(relay.build(), from)))
    }

    /// The reset email for `to`, pointing at `reset_url`.
    pub fn reset_message(&self, to: &str, reset_url: &str) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(RESET_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "You are receiving this email because you (or someone else) has \
                 requested the reset of a password.\n\
                 Please make a PUT request to:\n\n{reset_url}\n"
            ))?;
        Ok(message)
    }

    pub async fn send_reset_link(&self, to: &str, reset_url: &str) -> Result<(), MailError> {
        let message = self.reset_message(to, reset_url)?;
        self.transport.send(message).await?;
        tracing::info!(to, "Password reset email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn mailer() -> ResetMailer {
        ResetMailer::new(
            AsyncSmtpTransport::<Tokio1Executor>::unencrypted_localhost(),
            DEFAULT_FROM.parse().unwrap(),
        )
    }

    #[test]
    fn reset_message_carries_link_and_subject() {
        let url = "http://localhost:5000/api/v1/auth/resetpassword/abc123";
        let message = mailer().reset_message("jane@example.com", url).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Password reset token"));
        assert!(raw.contains("To: jane@example.com"));
        assert!(raw.contains(url));
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let result = mailer().reset_message("not-an-address", "http://x/abc");
        assert_matches!(result, Err(MailError::Address(_)));
    }
}
