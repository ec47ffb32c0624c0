mod clipboard;
mod display;
mod repl;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use priorauth_client::{DEFAULT_API_URL, ExtractClient};
use priorauth_core::{Demo, ExportFormat};
use priorauth_session::{ReviewSession, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::clipboard::CommandClipboard;
use crate::display::ReviewCard;

#[derive(Parser, Debug)]
#[command(name = "priorauth", version, about = "Review prior-authorization packet extractions")]
struct Cli {
    /// Base URL of the extraction service
    #[arg(long, env = "PRIORAUTH_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Command that receives the appeal outline on stdin (e.g. `pbcopy`, `wl-copy`)
    #[arg(long, env = "PRIORAUTH_CLIPBOARD_CMD", global = true)]
    clipboard_cmd: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a packet and print the review card
    Extract {
        /// Packet to upload (pdf, png, jpg, jpeg, tiff, bmp, svg, txt)
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the review card for a canned result
    Demo {
        /// `complete` or `incomplete`
        name: Demo,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Interactive review loop on stdin
    Review,
    /// Probe the extraction service
    Health,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Order fields within each section by descending confidence
    #[arg(long)]
    sort_by_confidence: bool,

    /// Draft the appeal outline (only offered for Start Appeal Draft)
    #[arg(long)]
    appeal: bool,

    /// Save the appeal outline into this directory
    #[arg(long, requires = "appeal")]
    save_dir: Option<PathBuf>,

    /// Saved outline format: txt or md
    #[arg(long, default_value = "txt")]
    format: ExportFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the review card.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("priorauth v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let client = ExtractClient::new(cli.api_url.clone());
    info!(api_url = %client.base_url(), "extraction service configured");

    match cli.command {
        Commands::Extract { file, output } => {
            let mut session = ReviewSession::new(client, SessionConfig::default());
            session.select_file(&file)?;
            session
                .submit()
                .await
                .with_context(|| format!("extracting {}", file.display()))?;
            present(&mut session, &output)?;
        }
        Commands::Demo { name, output } => {
            let mut session = ReviewSession::new(client, SessionConfig::default());
            session.load_demo(name)?;
            present(&mut session, &output)?;
        }
        Commands::Review => {
            let session = ReviewSession::new(client, SessionConfig::default());
            repl::run(session, CommandClipboard::new(cli.clipboard_cmd)).await?;
        }
        Commands::Health => {
            let status = client
                .health()
                .await
                .with_context(|| format!("probing {}", client.base_url()))?;
            println!("{} {}", client.base_url(), status);
        }
    }

    Ok(())
}

/// Apply the one-shot output flags and print the card.
fn present<E>(session: &mut ReviewSession<E>, output: &OutputArgs) -> anyhow::Result<()> {
    if output.sort_by_confidence {
        session.toggle_sort();
    }
    if output.appeal {
        let drafted = session.generate_outline().map(|_| ());
        if let Err(err) = drafted {
            print!("{}", ReviewCard(session));
            return Err(err).context("cannot draft appeal outline");
        }
        if let Some(dir) = &output.save_dir {
            session
                .download_outline(dir, output.format)
                .with_context(|| format!("saving outline into {}", dir.display()))?;
        }
    }
    print!("{}", ReviewCard(session));
    Ok(())
}
