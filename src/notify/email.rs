// SMTP Mailer - Using lettre

use crate::Result;
use crate::config::SmtpConfig;
use crate::error::NotifierError;
use crate::notify::channels::{DispatchOutcome, Mailer};
use crate::notify::template::ExpiryNotice;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header};
use lettre::{Message, SmtpTransport, Transport};

/// Plaintext, unauthenticated delivery through a local relay
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create new SMTP mailer
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Sender mailbox, e.g. `KISTI Grid CA <kisti-grid-ca@kisti.re.kr>`
    fn sender(&self) -> Result<Mailbox> {
        Ok(Mailbox::new(
            Some(self.config.from_name.clone()),
            self.config.from_address.parse()?,
        ))
    }

    /// Build email message from notice
    fn build_message(&self, recipient: &str, notice: &ExpiryNotice) -> Result<Message> {
        let message = Message::builder()
            .from(self.sender()?)
            .to(recipient.parse()?)
            .subject(notice.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(notice.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(notice.html_body.clone()),
                    ),
            )?;

        Ok(message)
    }

    /// Get SMTP transport
    fn get_transport(&self) -> SmtpTransport {
        SmtpTransport::builder_dangerous(&self.config.host)
            .port(self.config.port)
            .build()
    }

    async fn deliver(&self, recipient: &str, notice: &ExpiryNotice) -> Result<()> {
        let message = self.build_message(recipient, notice)?;
        let transport = self.get_transport();

        // Blocking SMTP exchange; awaited before the next recipient
        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map(|_| ())
                .map_err(NotifierError::from)
        })
        .await??;

        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, notice: &ExpiryNotice) -> DispatchOutcome {
        match self.deliver(recipient, notice).await {
            Ok(()) => DispatchOutcome::Sent,
            Err(e) => DispatchOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    fn mailer_name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> ExpiryNotice {
        ExpiryNotice {
            subject: "[Urgent] Certificate Expiration Notice (7 days left) - /CN=test...".to_string(),
            html_body: "<html><body>7 days</body></html>".to_string(),
            text_body: "7 days".to_string(),
        }
    }

    #[test]
    fn test_build_message_headers() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        let message = mailer.build_message("a@example.org", &notice()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("KISTI Grid CA"));
        assert!(raw.contains("<kisti-grid-ca@kisti.re.kr>"));
        assert!(raw.contains("To: a@example.org"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("text/plain"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        let result = mailer.build_message("not an address", &notice());
        assert!(matches!(result, Err(NotifierError::EmailError(_))));
    }

    #[tokio::test]
    async fn test_bad_recipient_is_failed_outcome() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        let outcome = mailer.send("not an address", &notice()).await;
        assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_failed_outcome() {
        // Bind then drop a listener so the port is known to be closed
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mailer = SmtpMailer::new(SmtpConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..SmtpConfig::default()
        });

        let outcome = mailer.send("a@example.org", &notice()).await;
        assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    }

    #[test]
    fn test_mailer_name() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        assert_eq!(mailer.mailer_name(), "smtp");
    }
}
