use anyhow::Result;
use clap::{Parser, Subcommand};

use solace::{app, commands, logging, Config, Session};

#[derive(Parser)]
#[command(name = "solace")]
#[command(version)]
#[command(about = "Mental health support chat in your terminal", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model identifier (overrides config and SOLACE_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Service root URL (overrides config and SOLACE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Maximum tokens per reply
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Write a default config file to ~/.solace/config.toml
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Show the resolved configuration
    Config,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    cli.apply_overrides(&mut config);

    match &cli.command {
        None => {
            let _guard = logging::init_tui(&config.log_dir(), cli.verbose);
            let session = Session::start(&config);
            app::run_tui(session, &config).await?;
        }
        Some(Commands::Ask { text }) => {
            logging::init_stderr(cli.verbose)?;
            let reply = commands::ask(&config, &text.join(" ")).await?;
            println!("{reply}");
        }
        Some(Commands::Init { force }) => {
            logging::init_stderr(cli.verbose)?;
            commands::init(&config, *force)?;
        }
        Some(Commands::Config) => {
            logging::init_stderr(cli.verbose)?;
            commands::show_config(&config)?;
        }
    }

    Ok(())
}
