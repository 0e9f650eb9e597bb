use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{AppOptions, BoardApp, DisplayState, HttpRemoteStore, LaunchParams};
use shared::domain::{Aesthetic, CommentColor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;
mod presenter;

use config::{load_settings, Settings, DEFAULT_CONFIG_FILE};
use presenter::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(name = "kudoboard", about = "Terminal client for shared message boards")]
struct Args {
    /// Board link or bare query string, e.g. `?code=ABC123`.
    link: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    public_url: Option<String>,
    #[arg(long)]
    poll_interval_secs: Option<u64>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.api_url {
            settings.api_url = v.clone();
        }
        if let Some(v) = &self.public_url {
            settings.public_base_url = v.clone();
        }
        if let Some(v) = self.poll_interval_secs.filter(|secs| *secs > 0) {
            settings.poll_interval_secs = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Themes,
    Create { aesthetic: Aesthetic, recipient: String },
    Join(String),
    Open(LaunchParams),
    Name(String),
    Color(CommentColor),
    Palette,
    Post(String),
    Back,
    Links,
    Reset,
    Quit,
}

const HELP: &str = "\
commands:
  themes                          list aesthetics
  create <aesthetic> <recipient>  start a new board
  join <code>                     join a board by code
  open <link>                     open a board link
  name <author>                   sign your messages (blank = Anonymous)
  palette | color <hex>           show or pick a message color
  post <message>                  post to the open board
  back                            return from the message view
  links                           show share links (creator only)
  reset | quit";

fn parse_link(raw: &str) -> LaunchParams {
    match Url::parse(raw) {
        Ok(url) => LaunchParams::from_url(&url),
        Err(_) => LaunchParams::from_query(raw),
    }
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match word.to_ascii_lowercase().as_str() {
        "" | "help" => Command::Help,
        "themes" => Command::Themes,
        "create" => {
            let (key, recipient) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let aesthetic = key.parse::<Aesthetic>().map_err(|err| err.to_string())?;
            Command::Create {
                aesthetic,
                recipient: recipient.trim().to_string(),
            }
        }
        "join" => Command::Join(rest.to_string()),
        "open" => Command::Open(parse_link(rest)),
        "name" => Command::Name(rest.to_string()),
        "color" => Command::Color(CommentColor::new(rest)),
        "palette" => Command::Palette,
        "post" => Command::Post(rest.to_string()),
        "back" => Command::Back,
        "links" => Command::Links,
        "reset" => Command::Reset,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(command)
}

struct Shell {
    app: BoardApp,
    public_base: Url,
    author: String,
}

impl Shell {
    /// Returns `false` once the user asked to leave.
    async fn run(&mut self, command: Command) -> bool {
        let outcome = match command {
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Themes => {
                for aesthetic in Aesthetic::ALL {
                    println!(
                        "  {:<14} {} - {}",
                        aesthetic.key(),
                        aesthetic.display_name(),
                        aesthetic.tagline()
                    );
                }
                Ok(())
            }
            Command::Create {
                aesthetic,
                recipient,
            } => self.app.create_board(aesthetic, &recipient).await.map(drop),
            Command::Join(code) => self.app.join_by_code(&code).await.map(drop),
            Command::Open(params) => self.app.launch(&params).await.map(drop),
            Command::Name(author) => {
                self.author = author;
                Ok(())
            }
            Command::Color(color) => self.app.select_color(color),
            Command::Palette => {
                let pending = self.app.session().pending_color().cloned();
                for color in self.app.palette() {
                    let marker = if Some(&color) == pending.as_ref() { "*" } else { " " };
                    println!(" {marker} {color}");
                }
                Ok(())
            }
            Command::Post(message) => self.app.post_comment(&self.author, &message).await.map(drop),
            Command::Back => {
                if !self.app.return_to_board() {
                    println!("nothing to go back to");
                }
                Ok(())
            }
            Command::Links => {
                match self.app.share_links(&self.public_base) {
                    Some(links) => {
                        println!("  contribute: {}", links.contributor);
                        if let Some(view) = links.view {
                            println!("  view:       {view}");
                        }
                        println!("  join code:  {}", links.join_code);
                    }
                    None => println!("share links are only available to the board creator"),
                }
                Ok(())
            }
            Command::Reset => {
                self.app.reset();
                Ok(())
            }
            Command::Quit => return false,
        };
        if let Err(err) = outcome {
            debug!(%err, state = %self.app.state(), "cli: command failed");
        }
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (mut settings, warnings) = load_settings(&args.config);
    args.apply(&mut settings);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    for warning in &warnings {
        warn!(config = %args.config.display(), "config: {warning}");
    }

    let public_base = Url::parse(&settings.public_base_url)
        .with_context(|| format!("invalid public url '{}'", settings.public_base_url))?;
    let options: AppOptions = settings.app_options();
    info!(api_url = %settings.api_url, poll_interval = ?options.poll_interval, "cli: starting");

    let store = Arc::new(HttpRemoteStore::new(settings.api_url.clone()));
    let mut shell = Shell {
        app: BoardApp::new(store, Arc::new(TerminalPresenter), options),
        public_base,
        author: String::new(),
    };

    let state = match &args.link {
        Some(link) => shell
            .app
            .launch(&parse_link(link))
            .await
            .unwrap_or(DisplayState::Landing),
        None => DisplayState::Landing,
    };
    if state == DisplayState::Landing {
        println!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line) {
            Ok(command) => {
                if !shell.run(command).await {
                    break;
                }
            }
            Err(message) => eprintln!("{message}"),
        }
    }

    shell.app.reset();
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
