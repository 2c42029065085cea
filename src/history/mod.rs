mod file;
mod memory;
mod redis;

pub use self::file::FileChatStore;
pub use self::memory::MemoryChatStore;
pub use self::redis::RedisChatStore;

use async_trait::async_trait;
use log::{ debug, info };
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use crate::cli::Args;
use crate::config::ConfigError;
use crate::models::chat::{ Chat, ChatId, ChatMap };

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("chat store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chat store holds malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("chat store Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// Parses a persisted blob. A blank blob is an empty store.
pub fn decode_chats(blob: &str) -> Result<ChatMap, StoreError> {
    if blob.trim().is_empty() {
        return Ok(ChatMap::new());
    }
    Ok(serde_json::from_str(blob)?)
}

pub fn encode_chats(chats: &ChatMap) -> Result<String, StoreError> {
    Ok(serde_json::to_string(chats)?)
}

/// Persists every chat as a single serialized blob.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Empty map when nothing has been stored yet.
    async fn load_all(&self) -> Result<ChatMap, StoreError>;

    /// Replaces the persisted state wholesale.
    async fn save_all(&self, chats: &ChatMap) -> Result<(), StoreError>;

    async fn create_chat(&self) -> Result<ChatId, StoreError> {
        let mut chats = self.load_all().await?;
        let id = ChatId::generate(&chats);
        chats.insert(id.clone(), Chat::default());
        self.save_all(&chats).await?;
        debug!("Created chat {}", id);
        Ok(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    File,
    Memory,
    Redis,
}

impl FromStr for StoreType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StoreType::File),
            "memory" => Ok(StoreType::Memory),
            "redis" => Ok(StoreType::Redis),
            other => Err(ConfigError::UnsupportedStore(other.to_string())),
        }
    }
}

pub fn create_chat_store(
    store_type: StoreType,
    args: &Args
) -> Result<Arc<dyn ChatStore>, ConfigError> {
    match store_type {
        StoreType::File => {
            let store = FileChatStore::new(&args.store_path);
            info!("Chats will be stored in file {}", store.path().display());
            Ok(Arc::new(store))
        }
        StoreType::Memory => {
            info!("Chats will be kept in process memory only");
            Ok(Arc::new(MemoryChatStore::default()))
        }
        StoreType::Redis => {
            let store = RedisChatStore::new(&args.store_redis_url, &args.store_redis_key)?;
            info!("Chats will be stored in Redis at {} (key {})", args.store_redis_url, args.store_redis_key);
            Ok(Arc::new(store))
        }
    }
}

pub fn initialize_chat_store(args: &Args) -> Result<Arc<dyn ChatStore>, ConfigError> {
    let store_type = args.store_type.parse::<StoreType>()?;
    create_chat_store(store_type, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Turn;
    use clap::Parser;

    #[tokio::test]
    async fn create_chat_persists_immediately() {
        let store = MemoryChatStore::default();
        let id = store.create_chat().await.unwrap();

        let chats = store.load_all().await.unwrap();
        assert_eq!(chats.len(), 1);
        assert!(chats[&id].is_empty());
    }

    #[tokio::test]
    async fn create_chat_keeps_existing_chats() {
        let store = MemoryChatStore::default();
        let first = store.create_chat().await.unwrap();

        let mut chats = store.load_all().await.unwrap();
        chats.get_mut(&first).unwrap().push(Turn::pending("hi"));
        store.save_all(&chats).await.unwrap();

        let second = store.create_chat().await.unwrap();
        assert_ne!(first, second);
        let chats = store.load_all().await.unwrap();
        assert_eq!(chats[&first].len(), 1);
        assert!(chats[&second].is_empty());
    }

    #[test]
    fn blank_blob_decodes_empty() {
        assert!(decode_chats("").unwrap().is_empty());
        assert!(decode_chats("  \n").unwrap().is_empty());
        assert!(decode_chats("{}").unwrap().is_empty());
    }

    #[test]
    fn blob_round_trips_in_creation_order() {
        let mut chats = ChatMap::new();
        chats.insert(ChatId::from("work"), Chat::default());
        let mut chat = Chat::default();
        chat.push(Turn { user: "q".into(), bot: "```\nx\n```".into() });
        chats.insert(ChatId::from("1700000000000"), chat);

        let blob = encode_chats(&chats).unwrap();
        assert!(blob.find("work").unwrap() < blob.find("1700000000000").unwrap());
        let back = decode_chats(&blob).unwrap();
        assert_eq!(back, chats);
        assert_eq!(back.keys().collect::<Vec<_>>(), chats.keys().collect::<Vec<_>>());
    }

    #[test]
    fn malformed_blob_is_rejected() {
        assert!(matches!(decode_chats("[1, 2]"), Err(StoreError::Json(_))));
        assert!(matches!(decode_chats("{\"a\": "), Err(StoreError::Json(_))));
    }

    #[test]
    fn unsupported_store_type_fails_before_building_a_store() {
        let args = Args::try_parse_from(["nexus-chat", "--store-type", "qdrant"]).unwrap();
        assert!(matches!(
            initialize_chat_store(&args),
            Err(ConfigError::UnsupportedStore(s)) if s == "qdrant"
        ));

        let args = Args::try_parse_from(["nexus-chat", "--store-type", "Memory"]).unwrap();
        assert!(initialize_chat_store(&args).is_ok());
    }

    #[test]
    fn store_type_parsing() {
        assert_eq!("FILE".parse::<StoreType>().unwrap(), StoreType::File);
        assert_eq!("redis".parse::<StoreType>().unwrap(), StoreType::Redis);
        assert!(matches!(
            "qdrant".parse::<StoreType>(),
            Err(ConfigError::UnsupportedStore(s)) if s == "qdrant"
        ));
    }
}
