use crate::config::Config;
use crate::llm::{CompletionBackend, LlmClient};
use crate::session::ChatSession;
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::info;

/// Run one submission cycle without the TUI and return the bot reply
pub async fn ask(config: &Config, text: &str) -> Result<String> {
    let client = LlmClient::new(config).context("Cannot reach the completion service")?;
    ask_with(Arc::new(client), text).await
}

pub async fn ask_with<B: CompletionBackend + 'static>(
    client: Arc<LlmClient<B>>,
    text: &str,
) -> Result<String> {
    let mut chat = ChatSession::new(client);
    if chat.submit(text).is_none() {
        bail!("Nothing to send: the message is empty");
    }

    let completion = chat
        .next_completion()
        .await
        .context("Completion task ended without a reply")?;
    chat.apply(completion);

    let reply = chat
        .messages()
        .last()
        .map(|m| m.text.clone())
        .unwrap_or_default();
    Ok(reply)
}

/// Write a default config file, keeping an existing one unless forced
pub fn init(config: &Config, force: bool) -> Result<()> {
    let path = config.config_path();
    if path.exists() && !force {
        println!("⚙️  Config already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let defaults = Config {
        solace_home: config.solace_home.clone(),
        ..Config::default()
    };
    let written = defaults.save()?;
    info!(path = %written.display(), "wrote config");

    println!("✅ Wrote {}", written.display());
    println!("Set OPENAI_API_KEY in your environment, or add openai_api_key to the file.");
    Ok(())
}

/// Print the resolved configuration with the credential masked
pub fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(&config.redacted())
        .context("Failed to serialize config")?;

    println!("# {}", config.config_path().display());
    print!("{rendered}");
    if !config.has_api_key() {
        println!("\n⚠️  No API key configured; the chat will start in the unavailable state.");
    }
    Ok(())
}
