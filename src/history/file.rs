use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use std::path::{ Path, PathBuf };
use tokio::fs;
use crate::history::{ decode_chats, encode_chats, ChatStore, StoreError };
use crate::models::chat::ChatMap;

/// JSON file holding the whole chat map.
pub struct FileChatStore {
    path: PathBuf,
}

impl FileChatStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChatStore for FileChatStore {
    async fn load_all(&self) -> Result<ChatMap, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No chat file at {}, starting empty", self.path.display());
                return Ok(ChatMap::new());
            }
            Err(e) => {
                return Err(e.into());
            }
        };
        let chats = decode_chats(&raw)?;
        debug!("Loaded {} chats from {}", chats.len(), self.path.display());
        Ok(chats)
    }

    async fn save_all(&self, chats: &ChatMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = encode_chats(chats)?;
        fs::write(&self.path, json).await?;
        debug!("Saved {} chats to {}", chats.len(), self.path.display());
        Ok(())
    }
}
