//! Messaging transport: the two chat operations the publisher needs.
//!
//! Production code goes through [`TelegramTransport`], a thin wrapper around
//! `teloxide::Bot`; tests substitute the scripted mock.

use crate::{error::PublishError, types::MessageHandle};
use async_trait::async_trait;
use teloxide::{
    payloads::SendMessageSetters,
    prelude::*,
    types::{ChatId, MessageId, ParseMode},
};

/// How the transport should interpret message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Telegram HTML parse mode
    Html,
}

/// Chat operations used by the publisher
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Sends `text` to `chat_id` and returns the new message's handle
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        format: TextFormat,
    ) -> Result<MessageHandle, PublishError>;

    /// Deletes a previously sent message
    async fn delete_message(&self, chat_id: i64, handle: MessageHandle)
        -> Result<(), PublishError>;
}

/// Telegram Bot API transport
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Builds a bot for `token`, optionally pointed at a custom Bot API server
    pub fn from_token(token: &str, api_url: Option<&reqwest::Url>) -> Self {
        let bot = Bot::new(token);
        let bot = match api_url {
            Some(url) => bot.set_api_url(url.clone()),
            None => bot,
        };
        Self::new(bot)
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        format: TextFormat,
    ) -> Result<MessageHandle, PublishError> {
        let request = self.bot.send_message(ChatId(chat_id), text.to_string());
        let request = match format {
            TextFormat::Html => request.parse_mode(ParseMode::Html),
        };
        let sent = request.await.map_err(PublishError::send)?;
        Ok(MessageHandle(sent.id.0))
    }

    async fn delete_message(
        &self,
        chat_id: i64,
        handle: MessageHandle,
    ) -> Result<(), PublishError> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(handle.0))
            .await
            .map_err(|e| PublishError::delete(handle.0, e))?;
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// A message the mock transport was asked to send
    #[derive(Debug, Clone, PartialEq)]
    pub struct SentMessage {
        pub chat_id: i64,
        pub text: String,
        pub format: TextFormat,
        pub handle: MessageHandle,
    }

    #[derive(Default)]
    struct Inner {
        next_id: i32,
        sent: Vec<SentMessage>,
        deleted: Vec<MessageHandle>,
        send_failures: VecDeque<String>,
        delete_failures: VecDeque<String>,
    }

    /// Mock transport for testing
    ///
    /// Hands out increasing message ids starting at 1 and records every
    /// call. Queued failures are consumed one call at a time.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        inner: Arc<Mutex<Inner>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next_send(&self, reason: &str) {
            self.inner
                .lock()
                .unwrap()
                .send_failures
                .push_back(reason.to_string());
        }

        pub fn fail_next_delete(&self, reason: &str) {
            self.inner
                .lock()
                .unwrap()
                .delete_failures
                .push_back(reason.to_string());
        }

        pub fn sent(&self) -> Vec<SentMessage> {
            self.inner.lock().unwrap().sent.clone()
        }

        pub fn deleted(&self) -> Vec<MessageHandle> {
            self.inner.lock().unwrap().deleted.clone()
        }

        pub fn send_count(&self) -> usize {
            self.inner.lock().unwrap().sent.len()
        }
    }

    #[async_trait]
    impl MessageTransport for MockTransport {
        async fn send_message(
            &self,
            chat_id: i64,
            text: &str,
            format: TextFormat,
        ) -> Result<MessageHandle, PublishError> {
            let mut inner = self.inner.lock().unwrap();
            if let Some(reason) = inner.send_failures.pop_front() {
                return Err(PublishError::Send(reason));
            }
            inner.next_id += 1;
            let handle = MessageHandle(inner.next_id);
            inner.sent.push(SentMessage {
                chat_id,
                text: text.to_string(),
                format,
                handle,
            });
            Ok(handle)
        }

        async fn delete_message(
            &self,
            _chat_id: i64,
            handle: MessageHandle,
        ) -> Result<(), PublishError> {
            let mut inner = self.inner.lock().unwrap();
            if let Some(reason) = inner.delete_failures.pop_front() {
                return Err(PublishError::delete(handle.0, reason));
            }
            inner.deleted.push(handle);
            Ok(())
        }
    }
}
