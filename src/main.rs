//! `llm-tui-chat` binary: wires configuration, the completion backend and
//! the terminal together and runs one chat session.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use llm_tui_chat::config::{prompts_builtin, Config};
use llm_tui_chat::core::{ChatEngine, Session};
use llm_tui_chat::providers::OpenAICompatProvider;
use llm_tui_chat::ui::{self, Interrupts, LinePrompt, Terminal};

/// LLM TUI Chat with context display and verbose mode.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Display the full conversation context (history) for debugging.
    #[arg(long)]
    verbose: bool,

    /// Custom system prompt for the LLM.
    #[arg(long, default_value = prompts_builtin::DEFAULT)]
    system: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "llm_tui_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::debug!(base_url = %config.base_url, model = %config.model, "configuration loaded");

    let provider = OpenAICompatProvider::new(config).context("failed to build HTTP client")?;
    let mut session = Session::new(ChatEngine::new(provider), cli.system, cli.verbose);

    let interrupts = Interrupts::ctrl_c().context("failed to install Ctrl-C handler")?;
    let mut input = LinePrompt::new(ui::spawn_stdin_lines(), interrupts, std::io::stdout());
    let mut terminal = Terminal::stdout();

    // A failed turn has already been reported; the exit is still a clean one.
    session.run(&mut input, &mut terminal).await?;

    Ok(())
}
