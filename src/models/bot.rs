use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;

/// Backend the remote endpoint should route a prompt to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bot {
    #[default]
    Ollama,
    Gemini,
}

impl Bot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bot::Ollama => "ollama",
            Bot::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseBotError {
    message: String,
}

impl fmt::Display for ParseBotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseBotError {}

impl FromStr for Bot {
    type Err = ParseBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Bot::Ollama),
            "gemini" => Ok(Bot::Gemini),
            _ =>
                Err(ParseBotError {
                    message: format!("Invalid bot: '{}' (expected ollama or gemini)", s),
                }),
        }
    }
}
