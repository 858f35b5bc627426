//! Live message publisher
//!
//! Owns the [`DisplayState`] and replaces the chat message whenever the
//! quote changes: send the new message first, then delete the old one.

use crate::{
    error::PublishError,
    transport::{MessageTransport, TextFormat},
    types::{DisplayState, MessageHandle, PriceSample},
};
use std::sync::Arc;

/// What a publish attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Quote matches the live message, nothing sent
    Unchanged,
    /// A new message went out
    Replaced {
        handle: MessageHandle,
        /// Message that was live before, if any
        previous: Option<MessageHandle>,
        /// Whether `previous` was removed from the chat
        previous_deleted: bool,
    },
}

/// Publishes price messages to a single chat
pub struct MessagePublisher {
    transport: Arc<dyn MessageTransport>,
    chat_id: i64,
    state: DisplayState,
}

impl MessagePublisher {
    pub fn new(transport: Arc<dyn MessageTransport>, chat_id: i64) -> Self {
        Self {
            transport,
            chat_id,
            state: DisplayState::new(),
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// Sends `sample` unconditionally and makes it the live message
    pub async fn publish_initial(
        &mut self,
        sample: PriceSample,
    ) -> Result<MessageHandle, PublishError> {
        let text = sample.render();
        tracing::info!(chat_id = self.chat_id, text = %text, "Sending initial price");

        let handle = self.send(&text).await?;
        tracing::info!(message_id = %handle, "Message ID for updates");

        self.state.record(handle, sample);
        Ok(handle)
    }

    /// Replaces the live message if `sample` differs from it
    ///
    /// Send failures leave the state untouched, so the old (now stale)
    /// message stays live and the next change retries the replace. Delete
    /// failures are logged and otherwise ignored.
    pub async fn publish_if_changed(
        &mut self,
        sample: PriceSample,
    ) -> Result<PublishOutcome, PublishError> {
        if self.state.last_message().is_none() {
            let handle = self.publish_initial(sample).await?;
            return Ok(PublishOutcome::Replaced {
                handle,
                previous: None,
                previous_deleted: false,
            });
        }

        if self.state.is_unchanged(&sample) {
            tracing::info!(price = sample.price, "Price unchanged, skipping update");
            return Ok(PublishOutcome::Unchanged);
        }

        let text = sample.render();
        tracing::info!(text = %text, "Price changed. Sending new message");

        let handle = self.send(&text).await?;

        // State advances whether or not the old message can be removed
        let previous = self.state.record(handle, sample);
        let previous_deleted = match previous {
            Some(old) => self.delete_best_effort(old).await,
            None => false,
        };

        Ok(PublishOutcome::Replaced {
            handle,
            previous,
            previous_deleted,
        })
    }

    async fn send(&self, text: &str) -> Result<MessageHandle, PublishError> {
        self.transport
            .send_message(self.chat_id, text, TextFormat::Html)
            .await
    }

    async fn delete_best_effort(&self, handle: MessageHandle) -> bool {
        match self.transport.delete_message(self.chat_id, handle).await {
            Ok(()) => {
                tracing::debug!(message_id = %handle, "Deleted previous message");
                true
            }
            Err(e) => {
                tracing::warn!(message_id = %handle, error = %e, "Failed to delete previous message");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use crate::types::DisplayPhase;

    const CHAT_ID: i64 = -1001234567890;

    fn publisher() -> (MessagePublisher, MockTransport) {
        let transport = MockTransport::new();
        let publisher = MessagePublisher::new(Arc::new(transport.clone()), CHAT_ID);
        (publisher, transport)
    }

    #[tokio::test]
    async fn test_publish_initial_records_state() {
        let (mut publisher, transport) = publisher();

        let handle = publisher
            .publish_initial(PriceSample::new(100.0, 5.0))
            .await
            .unwrap();

        assert_eq!(publisher.state().phase(), DisplayPhase::Published);
        assert_eq!(publisher.state().last_message(), Some(handle));
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, CHAT_ID);
        assert_eq!(sent[0].text, "$100.00 (+5.00%) 🚀🚀");
        assert_eq!(sent[0].format, TextFormat::Html);
    }

    #[tokio::test]
    async fn test_publish_initial_failure_leaves_uninitialized() {
        let (mut publisher, transport) = publisher();
        transport.fail_next_send("chat not found");

        let err = publisher
            .publish_initial(PriceSample::new(100.0, 1.0))
            .await
            .unwrap_err();

        assert_eq!(err, PublishError::Send("chat not found".to_string()));
        assert_eq!(publisher.state().phase(), DisplayPhase::Uninitialized);
    }

    #[tokio::test]
    async fn test_identical_sample_publishes_once() {
        let (mut publisher, transport) = publisher();

        let first = publisher
            .publish_if_changed(PriceSample::new(100.0, 1.0))
            .await
            .unwrap();
        let second = publisher
            .publish_if_changed(PriceSample::new(100.0, 1.0))
            .await
            .unwrap();

        assert!(matches!(first, PublishOutcome::Replaced { previous: None, .. }));
        assert_eq!(second, PublishOutcome::Unchanged);
        assert_eq!(transport.send_count(), 1);
        assert!(transport.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_change_sends_then_deletes_previous() {
        let (mut publisher, transport) = publisher();
        let first = publisher
            .publish_initial(PriceSample::new(100.0, 1.0))
            .await
            .unwrap();

        let outcome = publisher
            .publish_if_changed(PriceSample::new(101.5, 1.0))
            .await
            .unwrap();

        let PublishOutcome::Replaced {
            handle,
            previous,
            previous_deleted,
        } = outcome
        else {
            panic!("expected a replace");
        };
        assert_eq!(previous, Some(first));
        assert!(previous_deleted);
        assert_ne!(handle, first);
        assert_eq!(transport.deleted(), vec![first]);
        assert_eq!(publisher.state().last_message(), Some(handle));
        assert_eq!(publisher.state().last_price(), Some(101.5));
    }

    #[tokio::test]
    async fn test_send_failure_keeps_stale_state() {
        let (mut publisher, transport) = publisher();
        let first = publisher
            .publish_initial(PriceSample::new(100.0, 1.0))
            .await
            .unwrap();
        transport.fail_next_send("Too Many Requests: retry after 5");

        let result = publisher
            .publish_if_changed(PriceSample::new(99.0, -0.5))
            .await;

        assert!(matches!(result, Err(PublishError::Send(_))));
        assert_eq!(publisher.state().last_message(), Some(first));
        assert_eq!(publisher.state().last_price(), Some(100.0));
        assert!(transport.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_still_advances_state() {
        let (mut publisher, transport) = publisher();
        let first = publisher
            .publish_initial(PriceSample::new(100.0, 1.0))
            .await
            .unwrap();
        transport.fail_next_delete("message to delete not found");

        let outcome = publisher
            .publish_if_changed(PriceSample::new(100.0, 3.0))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PublishOutcome::Replaced {
                previous: Some(p),
                previous_deleted: false,
                ..
            } if p == first
        ));
        assert_eq!(transport.send_count(), 2);
        assert_eq!(publisher.state().last_percent_change(), Some(3.0));
        assert_ne!(publisher.state().last_message(), Some(first));
    }
}
