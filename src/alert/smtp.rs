//! SMTP alert transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::alert::{AlertDispatcher, DispatchError, Message, SmtpConfig};

/// Sends alerts through an SMTP relay, one connection per message.
#[derive(Debug, Clone, Default)]
pub struct SmtpDispatcher;

impl SmtpDispatcher {
    pub fn new() -> Self {
        Self
    }

    fn transport(server: &SmtpConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, DispatchError> {
        let mut builder = if server.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&server.server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&server.server)
        }
        .port(server.port);

        if !server.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                server.username.clone(),
                server.password.clone(),
            ));
        }
        Ok(builder.build())
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address.parse().map_err(|e: lettre::address::AddressError| DispatchError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Convert an alert into a lettre message.
pub fn build_email(message: &Message) -> Result<lettre::Message, DispatchError> {
    if message.to.is_empty() {
        return Err(DispatchError::NoRecipients);
    }

    let mut builder = lettre::Message::builder()
        .from(mailbox(&message.from)?)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for to in &message.to {
        builder = builder.to(mailbox(to)?);
    }
    Ok(builder.body(message.body.clone())?)
}

#[async_trait]
impl AlertDispatcher for SmtpDispatcher {
    async fn send(&self, message: &Message, server: &SmtpConfig) -> Result<(), DispatchError> {
        let email = build_email(message)?;
        let transport = Self::transport(server)?;
        transport.send(email).await?;

        tracing::debug!(
            subject = %message.subject,
            recipients = message.to.len(),
            server = %server.server,
            port = server.port,
            "Alert delivered"
        );
        Ok(())
    }
}
