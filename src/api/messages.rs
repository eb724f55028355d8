use super::cache::{QueryCache, QueryKey};
use super::client::CourierClient;
use super::models::*;

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Unchanged,
    Updated(Message),
}

/// Message calls with a read cache that is refreshed after each mutation.
pub struct MessageService {
    client: CourierClient,
    cache: QueryCache,
    cache_enabled: bool,
}

impl MessageService {
    pub fn new(client: CourierClient, cache_enabled: bool) -> Self {
        Self {
            client,
            cache: QueryCache::new(),
            cache_enabled,
        }
    }

    pub fn client(&self) -> &CourierClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn list_messages(&self) -> ApiResult<Vec<Message>> {
        if self.cache_enabled {
            if let Some(messages) = self.cache.messages().await {
                return ApiResult::ok(messages);
            }
        }

        let result = self.client.fetch_messages().await;
        if let (true, Some(messages)) = (self.cache_enabled, &result.data) {
            self.cache.put_messages(messages.clone()).await;
        }
        result
    }

    pub async fn get_message(&self, id: i64) -> ApiResult<Message> {
        if self.cache_enabled {
            if let Some(message) = self.cache.message(id).await {
                return ApiResult::ok(message);
            }
        }

        let result = self.client.fetch_message(id).await;
        if let (true, Some(message)) = (self.cache_enabled, &result.data) {
            self.cache.put_message(message.clone()).await;
        }
        result
    }

    pub async fn send_message(&self, content: &str) -> ApiResult<Message> {
        let request = CreateMessageRequest {
            content: content.to_string(),
        };
        let result = self.client.create_message(&request).await;
        if !result.is_error() {
            self.cache.invalidate(QueryKey::Messages).await;
        }
        result
    }

    /// Updates the message unless the trimmed text matches what is stored.
    pub async fn edit_message(&self, id: i64, content: &str) -> ApiResult<EditOutcome> {
        let current = match self.get_message(id).await.into_result() {
            Ok(message) => message,
            Err(error) => return ApiResult::err(error),
        };

        if content.trim() == current.content {
            return ApiResult::ok(EditOutcome::Unchanged);
        }

        let request = UpdateMessageRequest {
            content: content.to_string(),
        };
        let result = self.client.update_message(id, &request).await;
        if !result.is_error() {
            self.cache.invalidate(QueryKey::Messages).await;
            self.cache.invalidate(QueryKey::Message(id)).await;
        }
        result.map(EditOutcome::Updated)
    }

    pub async fn remove_message(&self, id: i64) -> ApiResult<()> {
        let result = self.client.delete_message(id).await;
        if !result.is_error() {
            self.cache.invalidate(QueryKey::Messages).await;
            self.cache.invalidate(QueryKey::Message(id)).await;
        }
        result
    }

    pub async fn clear(&self) {
        self.cache.clear().await;
    }
}
