use anyhow::Context;
use axum::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// Outbound notification sink. Sends are best-effort; callers decide whether
/// a failure matters.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let creds = Credentials::new(cfg.username.clone(), cfg.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .context("smtp relay")?
            .port(cfg.port)
            .credentials(creds)
            .build();
        let from = cfg
            .from
            .parse::<Mailbox>()
            .context("parse MAIL_DEFAULT_SENDER")?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>().context("parse recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("build message")?;
        self.transport.send(message).await.context("smtp send")?;
        Ok(())
    }
}

pub const RESET_SUBJECT: &str = "Password Reset Request";

/// HTML body for the password-reset mail, linking to the hosted reset form.
pub fn reset_email_body(reset_url: &str) -> String {
    format!(
        "<p>A password reset was requested for your Sportify account.</p>\
         <p><a href=\"{reset_url}\">Reset your password</a></p>\
         <p>The link is valid for one hour. If you did not request this, you can ignore this email.</p>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_body_embeds_link() {
        let url = "http://localhost:8080/user/reset_password_form?token=abc.def";
        let body = reset_email_body(url);
        assert!(body.contains(url));
        assert!(body.contains("one hour"));
    }

    #[tokio::test]
    async fn smtp_mailer_rejects_unparsable_recipient() {
        let cfg = SmtpConfig {
            host: "localhost".into(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "no-reply@sportify.local".into(),
        };
        let mailer = SmtpMailer::new(&cfg).expect("build mailer");
        let err = mailer
            .send("not-an-address", RESET_SUBJECT, "<p>hi</p>")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("recipient"));
    }
}
