use async_trait::async_trait;
use ::redis::{ AsyncCommands, Client };
use log::debug;
use crate::config::ConfigError;
use crate::history::{ decode_chats, encode_chats, ChatStore, StoreError };
use crate::models::chat::ChatMap;

/// Stores the serialized chat map under a single Redis key.
pub struct RedisChatStore {
    client: Client,
    key: String,
}

impl RedisChatStore {
    pub fn new(url: &str, key: &str) -> Result<Self, ConfigError> {
        let client = Client::open(url).map_err(|e| ConfigError::InvalidRedisUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            key: key.to_string(),
        })
    }

    async fn get_connection(&self) -> Result<::redis::aio::MultiplexedConnection, ::redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }
}

#[async_trait]
impl ChatStore for RedisChatStore {
    async fn load_all(&self) -> Result<ChatMap, StoreError> {
        let mut conn = self.get_connection().await?;
        let blob: Option<String> = conn.get(&self.key).await?;
        let chats = decode_chats(blob.as_deref().unwrap_or_default())?;
        debug!("Loaded {} chats from Redis key {}", chats.len(), self.key);
        Ok(chats)
    }

    async fn save_all(&self, chats: &ChatMap) -> Result<(), StoreError> {
        let mut conn = self.get_connection().await?;
        let json = encode_chats(chats)?;
        let _: () = conn.set(&self.key, json).await?;
        debug!("Saved {} chats to Redis key {}", chats.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "needs a Redis server at STORE_REDIS_URL or redis://127.0.0.1:6379"]
    async fn save_then_load_against_live_server() {
        let url = std::env::var("STORE_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let key = format!("nexus-chat-test-{}", chrono::Utc::now().timestamp_millis());
        let store = RedisChatStore::new(&url, &key).unwrap();

        assert!(store.load_all().await.unwrap().is_empty());

        let mut chats = ChatMap::new();
        chats.insert(crate::models::chat::ChatId::from("work"), Default::default());
        store.save_all(&chats).await.unwrap();
        assert_eq!(store.load_all().await.unwrap(), chats);

        let mut conn = store.get_connection().await.unwrap();
        let _: () = conn.del(&key).await.unwrap();
    }

    #[test]
    fn rejects_malformed_url() {
        assert!(matches!(
            RedisChatStore::new("not a url", "k"),
            Err(ConfigError::InvalidRedisUrl { .. })
        ));
        assert!(RedisChatStore::new("redis://127.0.0.1:6379", "quantumNexusChats").is_ok());
    }
}
