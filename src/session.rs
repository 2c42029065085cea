use crate::history::{ ChatStore, StoreError };
use crate::models::bot::Bot;
use crate::models::chat::{ latest_chat_id, Chat, ChatId, Turn };
use crate::render::{ render_chat, RenderedMessage };
use crate::transport::{ Transport, TransportError };

use log::{ debug, error, info, warn };
use std::sync::Arc;

/// Bot text when the endpoint could not be reached at all.
pub const UNREACHABLE_REPLY: &str = "Error: Could not reach server";
/// Bot text when the endpoint answered with something unreadable.
pub const MALFORMED_REPLY: &str = "An error occurred. Please try again.";

fn fallback_reply(err: &TransportError) -> &'static str {
    match err {
        TransportError::Network(_) => UNREACHABLE_REPLY,
        TransportError::Decode(_) => MALFORMED_REPLY,
    }
}

/// Drives one active chat: stores the prompt with a placeholder reply, asks
/// the endpoint, overwrites the placeholder and re-renders the whole chat.
pub struct ChatSession {
    store: Arc<dyn ChatStore>,
    transport: Arc<dyn Transport>,
    chat_id: ChatId,
}

impl ChatSession {
    /// Opens `chat_id`, creating it when absent. Without an id the most
    /// recent chat is reopened, or a new one is created for an empty store.
    pub async fn open(
        store: Arc<dyn ChatStore>,
        transport: Arc<dyn Transport>,
        chat_id: Option<ChatId>
    ) -> Result<Self, StoreError> {
        let mut chats = store.load_all().await?;
        let chat_id = match chat_id {
            Some(id) => {
                if !chats.contains_key(&id) {
                    info!("Chat {} not found, starting it empty", id);
                    chats.insert(id.clone(), Chat::default());
                    store.save_all(&chats).await?;
                }
                id
            }
            None =>
                match latest_chat_id(&chats) {
                    Some(id) => id,
                    None => store.create_chat().await?,
                }
        };
        let pending = chats
            .get(&chat_id)
            .map(|chat| chat.messages.iter().filter(|turn| turn.is_pending()).count())
            .unwrap_or_default();
        if pending > 0 {
            warn!("Chat {} has {} turns whose reply never arrived", chat_id, pending);
        }
        debug!("Session opened on chat {}", chat_id);

        Ok(Self {
            store,
            transport,
            chat_id,
        })
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub async fn chat(&self) -> Result<Chat, StoreError> {
        let chats = self.store.load_all().await?;
        Ok(chats.get(&self.chat_id).cloned().unwrap_or_default())
    }

    pub async fn render(&self) -> Result<Vec<RenderedMessage>, StoreError> {
        Ok(render_chat(&self.chat().await?))
    }

    pub async fn chats(&self) -> Result<Vec<(ChatId, usize)>, StoreError> {
        let chats = self.store.load_all().await?;
        Ok(
            chats
                .into_iter()
                .map(|(id, chat)| (id, chat.len()))
                .collect()
        )
    }

    pub async fn new_chat(&mut self) -> Result<ChatId, StoreError> {
        let id = self.store.create_chat().await?;
        info!("Started new chat {}", id);
        self.chat_id = id.clone();
        Ok(id)
    }

    /// Returns false and keeps the current chat when `id` is unknown.
    pub async fn switch(&mut self, id: ChatId) -> Result<bool, StoreError> {
        let chats = self.store.load_all().await?;
        if !chats.contains_key(&id) {
            return Ok(false);
        }
        info!("Switched to chat {}", id);
        self.chat_id = id;
        Ok(true)
    }

    /// Sends a prompt. Blank prompts are ignored and return `None`.
    ///
    /// Transport failures never propagate: they become the turn's reply.
    pub async fn send(
        &mut self,
        prompt: &str,
        bot: Bot
    ) -> Result<Option<Vec<RenderedMessage>>, StoreError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        let mut chats = self.store.load_all().await?;
        let turn_index = chats.entry(self.chat_id.clone()).or_default().push(Turn::pending(prompt));
        self.store.save_all(&chats).await?;

        let reply = match self.transport.send(prompt, bot).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Chat request for {} failed: {}", self.chat_id, e);
                fallback_reply(&e).to_string()
            }
        };

        let chat = chats.entry(self.chat_id.clone()).or_default();
        chat.set_reply(turn_index, reply);
        let rendered = render_chat(chat);
        self.store.save_all(&chats).await?;

        Ok(Some(rendered))
    }
}
