use clap::Parser;
use crate::models::bot::Bot;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Endpoint Args ---
    /// URL of the chat endpoint that receives {prompt, bot} as JSON.
    #[arg(long, env = "CHAT_ENDPOINT", default_value = "http://127.0.0.1:5000/chat")]
    pub endpoint: String,

    /// Bot the endpoint should route prompts to (ollama, gemini)
    #[arg(long, env = "CHAT_BOT", default_value = "ollama")]
    pub bot: Bot,

    // --- Chat Store Args ---
    /// Chat store type (file, memory, redis)
    #[arg(long, env = "STORE_TYPE", default_value = "file")]
    pub store_type: String,

    /// Path of the JSON file used by the file store.
    #[arg(long, env = "STORE_PATH", default_value = "data/nexus_chats.json")]
    pub store_path: String,

    /// Redis URL used by the redis store.
    #[arg(long, env = "STORE_REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub store_redis_url: String,

    /// Redis key holding the serialized chats.
    #[arg(long, env = "STORE_REDIS_KEY", default_value = "quantumNexusChats")]
    pub store_redis_key: String,

    // --- Session Args ---
    /// Chat to open. Defaults to the most recent one.
    #[arg(long, env = "CHAT_ID")]
    pub chat_id: Option<String>,

    /// Start a fresh chat instead of resuming.
    #[arg(long, default_value = "false", conflicts_with = "chat_id")]
    pub new_chat: bool,

    /// List stored chats and exit.
    #[arg(long, default_value = "false")]
    pub list_chats: bool,

    /// Print the active chat and exit.
    #[arg(long, default_value = "false")]
    pub show: bool,

    /// Send a single prompt, print the chat and exit.
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
