mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "webbridge")]
#[command(about = "Schema-validated browser commands over a WebSocket bridge", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bridge: bind the port, wait for the extension, serve
    /// tool invocations from stdin
    Serve {
        /// Port to listen on (overrides config server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config server.host)
        #[arg(long)]
        host: Option<String>,

        /// Path to config file (default ~/.webbridge/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Inspect the command catalog
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },
}

#[derive(Subcommand)]
enum ToolsCommands {
    /// List all registered commands
    List {
        /// Print the raw schema documents as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { port, host, config } => {
            commands::serve(port, host, config).await?;
        }
        Commands::Tools { command } => match command {
            ToolsCommands::List { json } => {
                commands::tools_list(json)?;
            }
        },
    }

    Ok(())
}
