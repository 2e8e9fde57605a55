use std::sync::Arc;

use tracing::warn;

use crate::models::{ChatAttachment, ChatMessage, Sender};
use crate::remote::StudyFlowApi;

pub const WELCOME_MESSAGE: &str = "Hey! I'm your AI study companion. I'm here to help you ace your courses. Ask me anything about:\n\n\u{2022} Course concepts and explanations\n\u{2022} Homework and assignments\n\u{2022} Study strategies and tips\n\u{2022} Document analysis\n\u{2022} Exam preparation\n\nWhat would you like to work on?";
pub const OFFLINE_REPLY: &str = "I'm having trouble connecting. Make sure the backend is running!";
pub const EMPTY_REPLY: &str = "Sorry, I couldn't process that.";
pub const FILE_ONLY_TEXT: &str = "Uploaded a file";

/// One conversation with the study assistant. The transcript lives only in
/// memory and starts with a greeting.
pub struct ChatSession {
    api: Arc<dyn StudyFlowApi>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn StudyFlowApi>) -> Self {
        Self {
            api,
            messages: vec![ChatMessage::new(Sender::Assistant, WELCOME_MESSAGE)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Appends the student's message and the assistant's answer.
    ///
    /// Returns `None` when there is neither text nor a file. A failed request
    /// still produces a reply: the offline apology.
    pub async fn send(
        &mut self,
        text: &str,
        attachment: Option<ChatAttachment>,
    ) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() && attachment.is_none() {
            return None;
        }

        let shown = if text.is_empty() { FILE_ONLY_TEXT } else { text };
        let mut outgoing = ChatMessage::new(Sender::User, shown);
        if let Some(file) = &attachment {
            outgoing = outgoing.with_attachment(file.meta());
        }
        self.messages.push(outgoing);

        let reply = match self.api.chat(text, attachment.as_ref()).await {
            Ok(reply) if reply.response.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(reply) => reply.response,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                OFFLINE_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage::new(Sender::Assistant, reply));
        self.messages.last()
    }
}
