use async_trait::async_trait;
use tokio::sync::Mutex;
use crate::history::{ ChatStore, StoreError };
use crate::models::chat::ChatMap;

/// Keeps the blob for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryChatStore {
    chats: Mutex<ChatMap>,
}

impl MemoryChatStore {
    pub fn with_chats(chats: ChatMap) -> Self {
        Self { chats: Mutex::new(chats) }
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn load_all(&self) -> Result<ChatMap, StoreError> {
        Ok(self.chats.lock().await.clone())
    }

    async fn save_all(&self, chats: &ChatMap) -> Result<(), StoreError> {
        *self.chats.lock().await = chats.clone();
        Ok(())
    }
}
