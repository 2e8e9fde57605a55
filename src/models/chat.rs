use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

pub const ALLOWED_ATTACHMENT_TYPES: [&str; 3] = [
    "application/pdf",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    pub name: String,
    pub mime_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub attachment: Option<AttachmentMeta>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: AttachmentMeta) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// A document checked against the type and size limits. Construction is the
/// only way to get one, so an unchecked file never reaches the network.
#[derive(Debug, Clone)]
pub struct ChatAttachment {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl ChatAttachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AppError> {
        let mime_type = mime_type.into();
        if !ALLOWED_ATTACHMENT_TYPES.contains(&mime_type.as_str()) {
            return Err(AppError::Attachment(
                "Please upload a PDF, TXT, or DOCX file".to_string(),
            ));
        }
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AppError::Attachment(
                "File size should be less than 10MB".to_string(),
            ));
        }

        Ok(Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn meta(&self) -> AttachmentMeta {
        AttachmentMeta {
            name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            size: self.bytes.len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub file_uploaded: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}
