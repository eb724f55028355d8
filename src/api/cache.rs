use std::collections::HashMap;
use tokio::sync::RwLock;

use super::models::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Messages,
    Message(i64),
}

#[derive(Debug, Clone)]
enum CachedValue {
    Messages(Vec<Message>),
    Message(Message),
}

/// Last successful result per query. Entries live until invalidated.
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, CachedValue>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Option<Vec<Message>> {
        match self.entries.read().await.get(&QueryKey::Messages) {
            Some(CachedValue::Messages(messages)) => Some(messages.clone()),
            _ => None,
        }
    }

    pub async fn message(&self, id: i64) -> Option<Message> {
        match self.entries.read().await.get(&QueryKey::Message(id)) {
            Some(CachedValue::Message(message)) => Some(message.clone()),
            _ => None,
        }
    }

    pub async fn put_messages(&self, messages: Vec<Message>) {
        self.entries
            .write()
            .await
            .insert(QueryKey::Messages, CachedValue::Messages(messages));
    }

    pub async fn put_message(&self, message: Message) {
        self.entries
            .write()
            .await
            .insert(QueryKey::Message(message.id), CachedValue::Message(message));
    }

    pub async fn contains(&self, key: QueryKey) -> bool {
        self.entries.read().await.contains_key(&key)
    }

    pub async fn invalidate(&self, key: QueryKey) {
        if self.entries.write().await.remove(&key).is_some() {
            log::debug!("Invalidated cached query {:?}", key);
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
