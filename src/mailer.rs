use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

/// Outbound mail seam. Handlers only see this trait so tests can swap in a
/// recording fake.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a verification code and confirm the relay accepted it.
    async fn send_code(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, username: &str, password: &str, from: &str) -> anyhow::Result<Self> {
        let creds = Credentials::new(username.to_string(), password.to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(creds)
            .build();
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("invalid SMTP_FROM address: {e}"))?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse::<Mailbox>()
                .map_err(|e| anyhow::anyhow!("invalid recipient address: {e}"))?)
            .subject("Verify your email")
            .header(ContentType::TEXT_HTML)
            .body(format!("<h1>{code}</h1>"))?;

        debug!(to = %to, "sending verification mail");
        let response = self.transport.send(message).await?;
        if !response.is_positive() {
            anyhow::bail!("smtp relay did not accept the message");
        }
        info!(to = %to, "verification mail accepted by relay");
        Ok(())
    }
}

/// Captures outgoing mail instead of sending it. Used by `AppState::fake()`.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
    pub reject: bool,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        if self.reject {
            anyhow::bail!("fake relay rejected message");
        }
        self.sent
            .lock()
            .expect("fake mailer lock")
            .push((to.to_string(), code.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_mailer_records_deliveries() {
        let mailer = FakeMailer::default();
        mailer.send_code("user@test.com", "123456").await.unwrap();
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("user@test.com".to_string(), "123456".to_string()));
    }

    #[tokio::test]
    async fn fake_mailer_can_simulate_rejection() {
        let mailer = FakeMailer {
            reject: true,
            ..Default::default()
        };
        assert!(mailer.send_code("user@test.com", "123456").await.is_err());
    }

    #[test]
    fn smtp_mailer_rejects_bad_from_address() {
        let err = SmtpMailer::new("smtp.test.com", "u", "p", "not an address").unwrap_err();
        assert!(err.to_string().contains("invalid SMTP_FROM"));
    }
}
