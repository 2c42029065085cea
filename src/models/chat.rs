use serde::{ Serialize, Deserialize };
use indexmap::IndexMap;
use std::fmt;

/// Bot text stored while the remote reply is still outstanding.
pub const PENDING_REPLY: &str = "...";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub bot: String,
}

impl Turn {
    pub fn pending(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: PENDING_REPLY.to_string(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.bot == PENDING_REPLY
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default)]
    pub messages: Vec<Turn>,
}

impl Chat {
    pub fn push(&mut self, turn: Turn) -> usize {
        self.messages.push(turn);
        self.messages.len() - 1
    }

    /// Overwrites the bot text of an existing turn. Returns false when the
    /// index is out of range.
    pub fn set_reply(&mut self, index: usize, reply: impl Into<String>) -> bool {
        match self.messages.get_mut(index) {
            Some(turn) => {
                turn.bot = reply.into();
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Millisecond-timestamp chat identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocates an id from the current time that is not already a key in
    /// `existing`.
    pub fn generate(existing: &ChatMap) -> Self {
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let id = ChatId(millis.to_string());
            if !existing.contains_key(&id) {
                return id;
            }
            millis += 1;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        ChatId(s.to_string())
    }
}

/// Every chat keyed by id, in creation order; this is the unit that gets
/// persisted.
pub type ChatMap = IndexMap<ChatId, Chat>;

/// The most recently created chat, if any.
pub fn latest_chat_id(chats: &ChatMap) -> Option<ChatId> {
    chats.last().map(|(id, _)| id.clone())
}
