use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

/// Command line arguments for supportbot
#[derive(Parser, Debug)]
#[command(
    name = "supportbot",
    about = "Chat, tool-calling and support-agent demos against an OpenAI-compatible API"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub client: ClientArgs,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// API key for the chat service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Model name to use
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Seconds to wait for each chat completion
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question, no tools
    Chat {
        #[arg(default_value = "Explain the theory of relativity in simple terms.")]
        prompt: String,

        /// System prompt to set context
        #[arg(short, long, default_value = "You are a helpful assistant.")]
        system: String,
    },
    /// One tool-calling round trip with a mock weather lookup
    Weather {
        #[arg(default_value = "What's the weather like in Boston?")]
        question: String,
    },
    /// Interactive technical support agent; type 'quit' to exit
    Support,
}
