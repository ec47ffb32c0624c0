//! Interactive review loop: one command per stdin line.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use priorauth_client::Extractor;
use priorauth_core::{Demo, ExportFormat};
use priorauth_session::{Clipboard, ReviewSession, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::display::ReviewCard;

const HELP: &str = "\
Commands:
  file <path>               choose the packet to upload
  submit                    upload the chosen packet
  demo <complete|incomplete> load a canned result
  sort                      toggle confidence sort
  select <key>              open the source evidence for a field
  close                     close the evidence drawer
  appeal                    draft the appeal outline
  copy                      copy the outline to the clipboard
  download <txt|md> [dir]   save the outline (default dir: .)
  show                      print the review card
  help                      this list
  quit                      leave";

#[derive(Debug, Clone, PartialEq)]
enum ReplCommand {
    File(PathBuf),
    Submit,
    Demo(Demo),
    Sort,
    Select(String),
    Close,
    Appeal,
    Copy,
    Download {
        format: ExportFormat,
        dir: Option<PathBuf>,
    },
    Show,
    Help,
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
fn parse(line: &str) -> anyhow::Result<Option<ReplCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "file" => {
            if rest.is_empty() {
                bail!("usage: file <path>");
            }
            ReplCommand::File(PathBuf::from(rest))
        }
        "submit" => ReplCommand::Submit,
        "demo" => ReplCommand::Demo(rest.parse()?),
        "sort" => ReplCommand::Sort,
        "select" => {
            if rest.is_empty() {
                bail!("usage: select <key>");
            }
            ReplCommand::Select(rest.to_string())
        }
        "close" => ReplCommand::Close,
        "appeal" => ReplCommand::Appeal,
        "copy" => ReplCommand::Copy,
        "download" => {
            let (format, dir) = rest
                .split_once(char::is_whitespace)
                .map(|(format, dir)| (format, Some(PathBuf::from(dir.trim()))))
                .unwrap_or((rest, None));
            let format = if format.is_empty() {
                ExportFormat::default()
            } else {
                format.parse()?
            };
            ReplCommand::Download { format, dir }
        }
        "show" => ReplCommand::Show,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run<E, C>(mut session: ReviewSession<E>, mut clipboard: C) -> anyhow::Result<()>
where
    E: Extractor,
    C: Clipboard,
{
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("flushing stdout")?;

        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        debug!(?command, "review command");
        match execute(&mut session, &mut clipboard, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => println!("error: {err}"),
        }
    }
    Ok(())
}

async fn execute<E: Extractor>(
    session: &mut ReviewSession<E>,
    clipboard: &mut dyn Clipboard,
    command: ReplCommand,
) -> Result<Flow, SessionError> {
    match command {
        ReplCommand::File(path) => {
            session.select_file(path)?;
            if let Some(file) = session.selected_file() {
                println!("selected {}", file.display());
            }
        }
        ReplCommand::Submit => {
            println!("extracting...");
            session.submit().await?;
            print!("{}", ReviewCard(session));
        }
        ReplCommand::Demo(demo) => {
            session.load_demo(demo)?;
            print!("{}", ReviewCard(session));
        }
        ReplCommand::Sort => {
            let on = session.toggle_sort();
            println!("confidence sort {}", if on { "on" } else { "off" });
            print!("{}", ReviewCard(session));
        }
        ReplCommand::Select(key) => {
            session.select_field(&key)?;
            print!("{}", ReviewCard(session));
        }
        ReplCommand::Close => {
            session.close_evidence();
            println!("evidence closed");
        }
        ReplCommand::Appeal => {
            println!("{}", session.generate_outline()?);
        }
        ReplCommand::Copy => {
            let copied = session.copy_outline(clipboard);
            if let Some(status) = session.status() {
                println!("{status}");
            }
            copied?;
        }
        ReplCommand::Download { format, dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            session.download_outline(&dir, format)?;
            if let Some(status) = session.status() {
                println!("{status}");
            }
        }
        ReplCommand::Show => print!("{}", ReviewCard(session)),
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
