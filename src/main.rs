use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod agent;
mod cli_args;
mod config;
mod demos;
mod error;
mod llm_client;
mod repl;
mod session;
mod tool_registry;
mod tools;
mod types;
mod utils;

#[cfg(test)]
mod mocks;
#[cfg(test)]
mod tests;

use agent::{Agent, AgentOptions};
use cli_args::{CliArgs, Commands};
use config::ClientConfig;
use repl::SessionEnd;
use session::Session;
use tool_registry::ToolRegistry;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = ClientConfig::from_args(&args.client)?;
    let client = config.build_client()?;
    debug!(model = client.model(), base_url = %config.base_url, "chat client ready");

    let opts = AgentOptions {
        step_timeout: config.timeout,
        ..AgentOptions::default()
    };
    let mut stdout = io::stdout();

    match args.command {
        Commands::Chat { prompt, system } => {
            let agent = Agent::new(Box::new(client), ToolRegistry::new(), opts);
            let mut session = Session::new(&system, Some(config.model.as_str()));
            demos::simple_chat(&agent, &mut session, &prompt, &mut stdout).await?;
        }
        Commands::Weather { question } => {
            let agent = Agent::new(Box::new(client), tools::weather_registry()?, opts);
            let mut session = Session::new(demos::WEATHER_SYSTEM_PROMPT, Some(config.model.as_str()));
            demos::weather_round_trip(&agent, &mut session, &question, &mut stdout).await?;
        }
        Commands::Support => {
            let registry = tools::support_registry(tools::SupportDesk::new())?;
            let agent = Agent::new(Box::new(client), registry, opts);
            let mut session = Session::new(repl::SUPPORT_SYSTEM_PROMPT, Some(config.model.as_str()));
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());

            let end = repl::run_support_session(&agent, &mut session, stdin, &mut stdout).await?;
            stdout.flush()?;
            if let SessionEnd::Aborted(_) = end {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
