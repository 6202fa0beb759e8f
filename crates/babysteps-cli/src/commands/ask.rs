//! One-shot question to the parenting assistant.

use std::io::Write;

use anyhow::{Result, bail};
use babysteps_core::assistant::{Conversation, Sender, assistant_context};
use babysteps_llm::{Client, LlmError, reply_text};

use crate::Config;
use crate::session::{Clock, Session};

pub async fn run<W: Write>(
    writer: &mut W,
    session: &Session,
    question: &str,
    config: &Config,
    clock: &Clock,
) -> Result<()> {
    let locale = session.locale();
    let mut chat = Conversation::new(locale);
    let Some(question) = chat.ask(question) else {
        bail!("question cannot be empty");
    };

    let context = assistant_context(session.app.state().active_baby(), clock.today());
    tracing::debug!(%context, model = %config.model, "asking assistant");
    let result = match config.api_key.as_deref() {
        Some(key) => match Client::new(key) {
            Ok(client) => {
                client
                    .with_api_url(config.api_url.as_str())
                    .with_model(config.model.as_str())
                    .ask(&question, &context)
                    .await
            }
            Err(e) => Err(e),
        },
        None => Err(LlmError::InvalidApiKey {
            reason: "no api_key configured",
        }),
    };
    chat.answer(reply_text(result, locale));

    for message in chat.messages() {
        let who = match message.sender {
            Sender::Assistant => locale.chat_assistant_label(),
            Sender::User => locale.chat_user_label(),
        };
        writeln!(writer, "{who}: {}", message.text)?;
    }
    Ok(())
}
