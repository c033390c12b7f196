//! Contact-form inquiries and the mail collaborator they are handed to.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{DomainError, ValidationError};

/// Subject line used for every inquiry.
pub const INQUIRY_SUBJECT: &str = "Website Inquiry";

/// Fields submitted through the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub message: String,
}

impl ContactForm {
    fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email_address", &self.email_address),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(name));
            }
        }
        Ok(())
    }
}

/// An outbound mail, already checked for header injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

impl MailMessage {
    /// Builds a message, rejecting line breaks in any header value.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        from: impl Into<String>,
        to: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let message = Self {
            subject: subject.into(),
            body: body.into(),
            from: from.into(),
            to,
        };
        check_header("subject", &message.subject)?;
        check_header("from", &message.from)?;
        for to in &message.to {
            check_header("to", to)?;
        }
        Ok(message)
    }
}

fn check_header(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains(['\r', '\n']) {
        return Err(ValidationError::HeaderInjection(name));
    }
    Ok(())
}

/// Failure reported by a mail collaborator.
#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound mail collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), NotifyError>;
}

/// Writes mail to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: MailMessage) -> Result<(), NotifyError> {
        tracing::info!(
            from = %message.from,
            to = ?message.to,
            subject = %message.subject,
            body = %message.body,
            "outbound mail"
        );
        Ok(())
    }
}

/// Where inquiries are sent from and to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub from: String,
    pub to: String,
}

/// Turns contact-form submissions into mail.
#[derive(Clone)]
pub struct ContactService {
    notifier: Arc<dyn Notifier>,
    mailbox: Mailbox,
}

impl ContactService {
    pub fn new(notifier: Arc<dyn Notifier>, mailbox: Mailbox) -> Self {
        Self { notifier, mailbox }
    }

    /// Validates the form and hands the inquiry off without waiting for
    /// delivery. Delivery failures are logged.
    #[tracing::instrument(skip(self, form))]
    pub fn submit_contact(&self, form: ContactForm) -> Result<(), DomainError> {
        form.validate()?;

        let body = [
            form.first_name.as_str(),
            form.last_name.as_str(),
            form.email_address.as_str(),
            form.message.as_str(),
        ]
        .join("\n");
        let message = MailMessage::new(
            INQUIRY_SUBJECT,
            body,
            self.mailbox.from.as_str(),
            vec![self.mailbox.to.clone()],
        )?;

        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.send(message).await {
                tracing::warn!(error = %e, "contact inquiry not delivered");
            }
        });
        metrics::counter!("shop_contact_inquiries_total").increment(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    struct ChannelNotifier(mpsc::UnboundedSender<MailMessage>);

    #[async_trait]
    impl Notifier for ChannelNotifier {
        async fn send(&self, message: MailMessage) -> Result<(), NotifyError> {
            self.0
                .send(message)
                .map_err(|e| NotifyError(e.to_string()))
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email_address: "asha@example.com".to_string(),
            message: "Do you work weekends?".to_string(),
        }
    }

    fn mailbox() -> Mailbox {
        Mailbox {
            from: "site@example.com".to_string(),
            to: "inbox@example.com".to_string(),
        }
    }

    #[test]
    fn header_with_newline_rejected() {
        let result = MailMessage::new("Hi\r\nBcc: x@y", "body", "a@b", vec!["c@d".to_string()]);
        assert_eq!(result, Err(ValidationError::HeaderInjection("subject")));

        let result = MailMessage::new("Hi", "body", "a@b", vec!["c@d\nBcc: e@f".to_string()]);
        assert_eq!(result, Err(ValidationError::HeaderInjection("to")));
    }

    #[test]
    fn body_may_span_lines() {
        assert!(MailMessage::new("Hi", "line one\nline two", "a@b", vec![]).is_ok());
    }

    #[tokio::test]
    async fn submit_sends_joined_fields() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = ContactService::new(Arc::new(ChannelNotifier(tx)), mailbox());

        service.submit_contact(form()).unwrap();

        let sent = rx.recv().await.unwrap();
        assert_eq!(sent.subject, INQUIRY_SUBJECT);
        assert_eq!(
            sent.body,
            "Asha\nRao\nasha@example.com\nDo you work weekends?"
        );
        assert_eq!(sent.from, "site@example.com");
        assert_eq!(sent.to, vec!["inbox@example.com".to_string()]);
    }

    #[tokio::test]
    async fn blank_field_rejected_before_sending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = ContactService::new(Arc::new(ChannelNotifier(tx)), mailbox());

        let mut bad = form();
        bad.message = " ".to_string();
        let err = service.submit_contact(bad).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::EmptyField("message"))
        ));

        drop(service);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn misconfigured_mailbox_surfaces_as_invalid_header() {
        let service = ContactService::new(
            Arc::new(LogNotifier),
            Mailbox {
                from: "site@example.com\nCc: spam@example.com".to_string(),
                to: "inbox@example.com".to_string(),
            },
        );
        let err = service.submit_contact(form()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::HeaderInjection("from"))
        ));
    }
}
