//! Conversation state and context for the parenting assistant.
//!
//! The HTTP call itself lives in `babysteps-llm`; this module only decides
//! what is sent and how the transcript looks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::home::age_in_months;
use crate::locale::Locale;
use crate::model::Baby;

/// Context sent when no child is selected.
pub const GENERAL_CONTEXT: &str = "General advice";

/// Short description of the active child for the assistant.
#[must_use]
pub fn assistant_context(baby: Option<&Baby>, today: NaiveDate) -> String {
    baby.map_or_else(
        || GENERAL_CONTEXT.to_string(),
        |baby| {
            format!(
                "Child name: {}, age: {} months, gender: {}.",
                baby.name,
                age_in_months(baby.dob, today),
                baby.gender
            )
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

/// Transcript of one assistant session, opened by the greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Conversation {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            messages: vec![ChatMessage {
                sender: Sender::Assistant,
                text: locale.assistant_greeting().to_string(),
            }],
            pending: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a question is waiting for its answer.
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records a question. Blank input and questions asked while another is
    /// pending are ignored; returns the trimmed question when accepted.
    pub fn ask(&mut self, question: &str) -> Option<String> {
        let question = question.trim();
        if question.is_empty() || self.pending {
            return None;
        }
        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: question.to_string(),
        });
        self.pending = true;
        Some(question.to_string())
    }

    /// Records the reply to the pending question.
    pub fn answer(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            sender: Sender::Assistant,
            text: text.into(),
        });
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::Gender;

    #[test]
    fn context_describes_active_child() {
        let baby = Baby::new(
            "Aziza",
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            Gender::Girl,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(
            assistant_context(Some(&baby), today),
            "Child name: Aziza, age: 6 months, gender: girl."
        );
        assert_eq!(assistant_context(None, today), "General advice");
    }

    #[test]
    fn conversation_opens_with_greeting_and_serializes_questions() {
        let mut chat = Conversation::new(Locale::En);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::Assistant);

        assert!(chat.ask("   ").is_none());
        assert_eq!(chat.ask(" Why is she crying? ").as_deref(), Some("Why is she crying?"));
        assert!(chat.is_pending());
        assert!(chat.ask("Another?").is_none());

        chat.answer("Try feeding.");
        assert!(!chat.is_pending());
        assert_eq!(chat.messages().len(), 3);
    }
}
