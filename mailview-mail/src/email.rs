//! Email message types.

use crate::{Address, IntoAddress, MailError, Result};
use lettre::message::header::{HeaderName, HeaderValue};
use lettre::message::SinglePart;
use serde::{Deserialize, Serialize};

/// Email message.
///
/// Owned by the caller; a mailer fills in `body` and `is_body_html` through
/// [`MailerBase::populate_body`](crate::MailerBase::populate_body).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Email {
    /// Sender address.
    pub from: Option<Address>,
    /// Reply-to address.
    pub reply_to: Option<Address>,
    /// To recipients.
    pub to: Vec<Address>,
    /// CC recipients.
    pub cc: Vec<Address>,
    /// BCC recipients.
    pub bcc: Vec<Address>,
    /// Email subject.
    pub subject: Option<String>,
    /// Message body.
    pub body: Option<String>,
    /// Whether `body` is HTML or plain text.
    pub is_body_html: bool,
    /// Custom headers.
    pub headers: Vec<(String, String)>,
    /// Priority (1-5, 1 highest).
    pub priority: Option<u8>,
}

impl Email {
    /// Create a new empty email.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the from address.
    pub fn from(mut self, from: impl IntoAddress) -> Result<Self> {
        self.from = Some(from.into_address()?);
        Ok(self)
    }

    /// Set the reply-to address.
    pub fn reply_to(mut self, reply_to: impl IntoAddress) -> Result<Self> {
        self.reply_to = Some(reply_to.into_address()?);
        Ok(self)
    }

    /// Add a to recipient.
    pub fn to(mut self, to: impl IntoAddress) -> Result<Self> {
        self.to.push(to.into_address()?);
        Ok(self)
    }

    /// Add multiple to recipients.
    pub fn to_many<I, A>(mut self, recipients: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: IntoAddress,
    {
        for r in recipients {
            self.to.push(r.into_address()?);
        }
        Ok(self)
    }

    /// Add a CC recipient.
    pub fn cc(mut self, cc: impl IntoAddress) -> Result<Self> {
        self.cc.push(cc.into_address()?);
        Ok(self)
    }

    /// Add a BCC recipient.
    pub fn bcc(mut self, bcc: impl IntoAddress) -> Result<Self> {
        self.bcc.push(bcc.into_address()?);
        Ok(self)
    }

    /// Set the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Mark the body as HTML or plain text.
    pub fn body_html(mut self, is_body_html: bool) -> Self {
        self.is_body_html = is_body_html;
        self
    }

    /// Add a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the priority (1-5, 1 being highest).
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority.clamp(1, 5));
        self
    }

    /// Set high priority.
    pub fn high_priority(self) -> Self {
        self.priority(1)
    }

    /// Set low priority.
    pub fn low_priority(self) -> Self {
        self.priority(5)
    }

    /// Validate the email.
    pub fn validate(&self) -> Result<()> {
        if self.from.is_none() {
            return Err(MailError::MissingField("from"));
        }
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(MailError::MissingField("to/cc/bcc"));
        }
        if self.subject.is_none() {
            return Err(MailError::MissingField("subject"));
        }
        if self.body.is_none() {
            return Err(MailError::MissingField("body"));
        }
        Ok(())
    }

    /// Build a lettre message, ready for whatever transport the caller uses.
    pub fn to_lettre(&self) -> Result<lettre::Message> {
        self.validate()?;

        let (Some(from), Some(body)) = (&self.from, &self.body) else {
            return Err(MailError::MissingField("from"));
        };

        let mut builder = lettre::Message::builder()
            .from(from.to_mailbox()?)
            .subject(self.subject.as_deref().unwrap_or_default());

        for addr in &self.to {
            builder = builder.to(addr.to_mailbox()?);
        }
        for addr in &self.cc {
            builder = builder.cc(addr.to_mailbox()?);
        }
        for addr in &self.bcc {
            builder = builder.bcc(addr.to_mailbox()?);
        }

        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to.to_mailbox()?);
        }

        for (name, value) in &self.headers {
            builder = builder.raw_header(raw_header(name, value)?);
        }

        if let Some(priority) = self.priority {
            builder = builder.raw_header(raw_header("X-Priority", &priority.to_string())?);
        }

        let part = if self.is_body_html {
            SinglePart::html(body.clone())
        } else {
            SinglePart::plain(body.clone())
        };

        Ok(builder.singlepart(part)?)
    }
}

fn raw_header(name: &str, value: &str) -> Result<HeaderValue> {
    let name = HeaderName::new_from_ascii(name.to_string())
        .map_err(|_| MailError::InvalidHeader(name.to_string()))?;
    Ok(HeaderValue::new(name, value.to_string()))
}
