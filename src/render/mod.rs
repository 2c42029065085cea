pub mod terminal;

use crate::models::chat::Chat;

/// Literal delimiter between prose and code. It cannot be escaped.
pub const FENCE: &str = "```";

pub const USER_SENDER: &str = "You";
pub const BOT_SENDER: &str = "Bot";

/// Body of a fenced block, kept verbatim so the message can be rebuilt.
///
/// The first line is an optional language tag; the rest is the code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    body: String,
}

impl CodeBlock {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// The trimmed first line, when it is a non-empty run of
    /// `[A-Za-z0-9_-]`.
    pub fn language(&self) -> Option<&str> {
        let first_line = self.body.split('\n').next().unwrap_or_default().trim();
        if is_language_tag(first_line) {
            Some(first_line)
        } else {
            None
        }
    }

    /// Everything after the first newline. Empty when the body is one line.
    pub fn content(&self) -> &str {
        match self.body.find('\n') {
            Some(idx) => &self.body[idx + 1..],
            None => "",
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

fn is_language_tag(candidate: &str) -> bool {
    !candidate.is_empty() &&
        candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplaySegment {
    PlainText(String),
    CodeBlock(CodeBlock),
}

impl DisplaySegment {
    fn source(&self) -> &str {
        match self {
            DisplaySegment::PlainText(text) => text,
            DisplaySegment::CodeBlock(block) => block.body(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMessage {
    pub sender: String,
    pub segments: Vec<DisplaySegment>,
}

/// Splits `text` on fences. Segments alternate by position, starting with
/// plain text, so an unterminated trailing fence still yields a code block.
pub fn parse_segments(text: &str) -> Vec<DisplaySegment> {
    if text.is_empty() {
        return Vec::new();
    }

    text.split(FENCE)
        .enumerate()
        .map(|(idx, part)| {
            if idx % 2 == 0 {
                DisplaySegment::PlainText(part.to_string())
            } else {
                DisplaySegment::CodeBlock(CodeBlock::new(part))
            }
        })
        .collect()
}

/// Reinserts fences between segments.
pub fn to_source(segments: &[DisplaySegment]) -> String {
    segments
        .iter()
        .map(DisplaySegment::source)
        .collect::<Vec<_>>()
        .join(FENCE)
}

pub fn render_message(sender: &str, text: &str) -> RenderedMessage {
    RenderedMessage {
        sender: sender.to_string(),
        segments: parse_segments(text),
    }
}

/// Each turn becomes the user's message followed by the bot's.
pub fn render_chat(chat: &Chat) -> Vec<RenderedMessage> {
    chat.messages
        .iter()
        .flat_map(|turn| {
            [render_message(USER_SENDER, &turn.user), render_message(BOT_SENDER, &turn.bot)]
        })
        .collect()
}
