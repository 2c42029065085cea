pub mod cli;
pub mod config;
pub mod console;
pub mod history;
pub mod models;
pub mod render;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

use cli::Args;
use history::{ initialize_chat_store, ChatStore };
use log::info;
use models::chat::ChatId;
use session::ChatSession;
use std::error::Error;
use std::sync::Arc;
use tokio::io::{ self, AsyncWriteExt, BufReader };
use transport::HttpTransport;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let transport = Arc::new(HttpTransport::new(config::parse_endpoint(&args.endpoint)?));

    info!("--- Chat Configuration ---");
    info!("Endpoint: {}", transport.endpoint());
    info!("Bot: {}", args.bot);
    info!("Store Type: {}", args.store_type);
    info!("Requested Chat: {}", args.chat_id.as_deref().unwrap_or("most recent"));
    info!("-------------------------");

    let store = initialize_chat_store(&args)?;

    let requested = if args.new_chat {
        Some(store.create_chat().await?)
    } else {
        args.chat_id.as_deref().map(ChatId::from)
    };
    let mut session = ChatSession::open(store, transport, requested).await?;
    info!("Active chat: {}", session.chat_id());

    let mut stdout = io::stdout();

    if args.list_chats {
        return console::print_chat_list(&session, &mut stdout).await;
    }

    if let Some(prompt) = args.prompt.as_deref() {
        match session.send(prompt, args.bot).await? {
            Some(_) => console::print_chat(&session, &mut stdout).await?,
            None => {
                stdout.write_all(b"Nothing to send: prompt is empty\n").await?;
            }
        }
        return Ok(());
    }

    if args.show {
        return console::print_chat(&session, &mut stdout).await;
    }

    let stdin = BufReader::new(io::stdin());
    console::run_console(&mut session, args.bot, stdin, &mut stdout).await
}
