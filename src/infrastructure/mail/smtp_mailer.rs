//! SMTP mailer backed by `lettre`.

use super::service::{EmailMessage, MailError, Mailer};
use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use std::time::Duration;
use tracing::{debug, info};

const SMTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Delivers mail through an SMTP relay.
///
/// The transport keeps a connection pool, so one instance is shared by the
/// whole application.
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds the transport from configuration.
    ///
    /// No connection is opened until the first message is sent.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Config`] if TLS parameters cannot be built and
    /// [`MailError::Address`] if the sender address is malformed.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .timeout(Some(SMTP_TIMEOUT));

        builder = match config.tls.as_str() {
            "none" => builder.tls(Tls::None),
            mode => {
                let params = TlsParameters::new(config.host.clone())
                    .map_err(|e| MailError::Config(format!("TLS configuration error: {}", e)))?;
                if mode == "wrapper" {
                    builder.tls(Tls::Wrapper(params))
                } else {
                    builder.tls(Tls::Required(params))
                }
            }
        };

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| MailError::Address(format!("Invalid from address: {}", e)))?;

        info!(host = %config.host, port = config.port, "SMTP mailer initialized");

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }

    fn build_message(&self, message: EmailMessage) -> Result<Message, MailError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| MailError::Address(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(message.html_body),
                    ),
            )
            .map_err(|e| MailError::Message(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let to = message.to.clone();
        let email = self.build_message(message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!(to = %to, "Email sent");
        Ok(())
    }
}
