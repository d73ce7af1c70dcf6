//! Messages returned alongside operation results

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Message {
    pub fn new(message_type: MessageType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            message_type,
            detail: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(MessageType::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(MessageType::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(MessageType::Error, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Messages split by audience: users see parse problems, operators see
/// processing notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub user_messages: Vec<Message>,
    pub system_messages: Vec<Message>,
}

impl MessageResponse {
    pub fn has_errors(&self) -> bool {
        self.user_messages
            .iter()
            .chain(&self.system_messages)
            .any(|m| m.message_type == MessageType::Error)
    }
}
