use crate::models::bot::Bot;
use crate::models::chat::ChatId;
use crate::render::terminal::format_messages;
use crate::render::RenderedMessage;
use crate::session::ChatSession;

use log::{ info, warn };
use std::error::Error;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt };

const HELP: &str =
    "Commands:\n  /new            start a new chat\n  /chats          list chats\n  /switch <id>    open another chat\n  /bot <name>     choose ollama or gemini\n  /show           reprint the current chat\n  /help           show this help\n  /quit           exit\nStart a line with // to send a prompt beginning with /.\nAnything else is sent as a prompt.\n";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Send(String),
    New,
    Chats,
    Switch(ChatId),
    SelectBot(Bot),
    Show,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Some(literal) = line.strip_prefix("//") {
        return Command::Send(format!("/{}", literal));
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "new" => Command::New,
        "chats" => Command::Chats,
        "show" => Command::Show,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "switch" if !arg.is_empty() => Command::Switch(ChatId::from(arg)),
        "switch" => Command::Invalid("usage: /switch <chat id>".to_string()),
        "bot" =>
            match arg.parse::<Bot>() {
                Ok(bot) => Command::SelectBot(bot),
                Err(e) => Command::Invalid(e.to_string()),
            }
        other => Command::Invalid(format!("unknown command '/{}', try /help", other)),
    }
}

fn chat_header(id: &ChatId) -> String {
    format!("--- chat {} ---\n", id)
}

fn transcript(id: &ChatId, messages: &[RenderedMessage]) -> String {
    if messages.is_empty() {
        return format!("{}(no messages yet)\n", chat_header(id));
    }
    format!("{}{}", chat_header(id), format_messages(messages))
}

pub async fn print_chat<W>(session: &ChatSession, out: &mut W) -> Result<(), Box<dyn Error + Send + Sync>>
    where W: AsyncWrite + Unpin
{
    let messages = session.render().await?;
    out.write_all(transcript(session.chat_id(), &messages).as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

pub async fn print_chat_list<W>(session: &ChatSession, out: &mut W) -> Result<(), Box<dyn Error + Send + Sync>>
    where W: AsyncWrite + Unpin
{
    let mut listing = String::new();
    for (id, turns) in session.chats().await? {
        let marker = if &id == session.chat_id() { "*" } else { " " };
        listing.push_str(&format!("{} {} ({} turns)\n", marker, id, turns));
    }
    out.write_all(listing.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Line-oriented chat loop. Each prompt blocks the loop until its reply is
/// in, so at most one request is ever outstanding.
pub async fn run_console<R, W>(
    session: &mut ChatSession,
    mut bot: Bot,
    input: R,
    out: &mut W
) -> Result<(), Box<dyn Error + Send + Sync>>
    where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin
{
    print_chat(session, out).await?;
    let mut lines = input.lines();

    loop {
        out.write_all(format!("[{}] > ", bot).as_bytes()).await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Send(prompt) => {
                if prompt.is_empty() {
                    continue;
                }
                out.write_all(b"Bot is thinking...\n").await?;
                out.flush().await?;
                if let Some(messages) = session.send(&prompt, bot).await? {
                    out.write_all(transcript(session.chat_id(), &messages).as_bytes()).await?;
                }
            }
            Command::New => {
                session.new_chat().await?;
                print_chat(session, out).await?;
            }
            Command::Chats => print_chat_list(session, out).await?,
            Command::Switch(id) => {
                if session.switch(id.clone()).await? {
                    print_chat(session, out).await?;
                } else {
                    warn!("Unknown chat id {}", id);
                    out.write_all(format!("No chat with id {}\n", id).as_bytes()).await?;
                }
            }
            Command::SelectBot(selected) => {
                info!("Bot switched to {}", selected);
                bot = selected;
            }
            Command::Show => print_chat(session, out).await?,
            Command::Help => out.write_all(HELP.as_bytes()).await?,
            Command::Quit => break,
            Command::Invalid(msg) => out.write_all(format!("{}\n", msg).as_bytes()).await?,
        }
    }

    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{ ChatStore, MemoryChatStore };
    use crate::transport::{ Transport, TransportError };
    use async_trait::async_trait;
    use std::sync::Arc;

    struct BotEcho;

    #[async_trait]
    impl Transport for BotEcho {
        async fn send(&self, prompt: &str, bot: Bot) -> Result<String, TransportError> {
            Ok(format!("{} says ```txt\n{}\n```", bot, prompt))
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("  hello world "), Command::Send("hello world".into()));
        assert_eq!(parse_command("/new"), Command::New);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/switch 1700"), Command::Switch(ChatId::from("1700")));
        assert_eq!(parse_command("/bot Gemini"), Command::SelectBot(Bot::Gemini));
        assert!(matches!(parse_command("/bot gpt"), Command::Invalid(_)));
        assert!(matches!(parse_command("/switch"), Command::Invalid(_)));
        assert!(matches!(parse_command("/dance"), Command::Invalid(msg) if msg.contains("/dance")));
    }

    #[test]
    fn double_slash_sends_a_literal_slash_prompt() {
        assert_eq!(
            parse_command("//etc/hosts explain"),
            Command::Send("/etc/hosts explain".into())
        );
        assert_eq!(parse_command("  //new  "), Command::Send("/new".into()));
        assert!(matches!(parse_command("/etc/hosts explain"), Command::Invalid(_)));
    }

    #[tokio::test]
    async fn console_sends_escaped_slash_prompt() {
        let store = Arc::new(MemoryChatStore::default());
        let mut session = ChatSession::open(store.clone(), Arc::new(BotEcho), None).await.unwrap();

        let input: &[u8] = b"//etc/hosts explain\n";
        let mut out = Vec::new();
        run_console(&mut session, Bot::Ollama, input, &mut out).await.unwrap();

        let chats = store.load_all().await.unwrap();
        assert_eq!(chats[session.chat_id()].messages[0].user, "/etc/hosts explain");
    }

    #[tokio::test]
    async fn console_sends_prompts_with_selected_bot() {
        let store = Arc::new(MemoryChatStore::default());
        let mut session = ChatSession::open(store.clone(), Arc::new(BotEcho), None).await.unwrap();

        let input: &[u8] = b"first\n/bot gemini\nsecond\n\n/quit\nnever sent\n";
        let mut out = Vec::new();
        run_console(&mut session, Bot::Ollama, input, &mut out).await.unwrap();

        let chats = store.load_all().await.unwrap();
        let turns = &chats[session.chat_id()].messages;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].bot, "ollama says ```txt\nfirst\n```");
        assert_eq!(turns[1].bot, "gemini says ```txt\nsecond\n```");

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("(no messages yet)"));
        assert!(printed.contains("    [txt]\n    second\n"));
        assert!(printed.contains("[gemini] > "));
    }

    #[tokio::test]
    async fn console_switches_between_chats() {
        let store = Arc::new(MemoryChatStore::default());
        let mut session = ChatSession::open(store.clone(), Arc::new(BotEcho), None).await.unwrap();
        let first = session.chat_id().clone();

        let script = format!("one\n/new\n/switch nope\n/switch {}\n/chats\n", first);
        let mut out = Vec::new();
        run_console(&mut session, Bot::Ollama, script.as_bytes(), &mut out).await.unwrap();

        assert_eq!(session.chat_id(), &first);
        assert_eq!(store.load_all().await.unwrap().len(), 2);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("No chat with id nope"));
        assert!(printed.contains(&format!("* {} (1 turns)", first)));
    }
}
