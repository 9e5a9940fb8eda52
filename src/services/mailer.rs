//! Transactional email
//!
//! Best-effort SMTP delivery via lettre. Sends are fire-and-forget: the
//! handler path never waits on SMTP, and a delivery failure is logged but
//! never changes the outcome of the request that triggered it. Transient
//! SMTP errors are retried with exponential backoff for up to a minute.

use backoff::ExponentialBackoff;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

use crate::config::Settings;

#[derive(Clone)]
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl Mailer {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = SmtpTransport::starttls_relay(&settings.smtp_host)?
            .port(settings.smtp_port);

        if !settings.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.smtp_username.clone(),
                settings.smtp_password.clone(),
            ));
        }

        let from: Mailbox = settings.email_from_address.parse()?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Send one email, retrying transient SMTP failures. Blocking.
    fn send_blocking(&self, to: String, subject: String, body: String) -> anyhow::Result<()> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid recipient address: {e}"))?;

        let policy = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(60)),
            ..ExponentialBackoff::default()
        };

        backoff::retry(policy, || {
            let email = Message::builder()
                .from(self.from.clone())
                .to(recipient.clone())
                .subject(&subject)
                .body(body.clone())
                .map_err(|e| backoff::Error::permanent(anyhow::anyhow!(e)))?;

            self.transport
                .send(&email)
                .map(|_| ())
                .map_err(|e| backoff::Error::transient(anyhow::anyhow!(e)))
        })
        .map_err(|e| match e {
            backoff::Error::Permanent(e) => e,
            backoff::Error::Transient { err, .. } => err,
        })?;

        tracing::info!(subject = %subject, "Email sent");
        Ok(())
    }

    /// Queue an email without waiting for delivery
    fn send_detached(&self, to: String, subject: String, body: String) {
        let mailer = self.clone();
        tokio::spawn(async move {
            let result =
                tokio::task::spawn_blocking(move || mailer.send_blocking(to, subject, body)).await;
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "Email delivery failed"),
                Err(e) => tracing::error!(error = %e, "Email send task panicked"),
            }
        });
    }

    pub fn send_partner_verified(&self, to: String, partner_name: &str) {
        let subject = "Your partner profile has been verified".to_string();
        let body = format!(
            "Hi {partner_name},\n\n\
             Congratulations! Your partner profile has been verified. Clients can \
             now find and book your services.\n\n\
             The LocalPro Team"
        );
        self.send_detached(to, subject, body);
    }

    pub fn send_partner_rejected(&self, to: String, partner_name: &str, reason: &str) {
        let subject = "Your partner verification was not approved".to_string();
        let body = format!(
            "Hi {partner_name},\n\n\
             Unfortunately your partner verification was not approved.\n\n\
             Reason: {reason}\n\n\
             Please update your profile and documents, then resubmit for review.\n\n\
             The LocalPro Team"
        );
        self.send_detached(to, subject, body);
    }
}
