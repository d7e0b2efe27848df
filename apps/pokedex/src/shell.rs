//! Line-oriented interactive driver for the controller.

use std::sync::Arc;

use anyhow::Result;
use dex_core::DexController;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::render::render;

const SUGGESTION_LIMIT: usize = 10;

pub const HELP: &str = "\
commands:
  search <name|id>   show one entry
  random             random entry from the selected region
  next | prev        step through ids while showing an entry
  browse [region]    page through a region (selected region by default)
  more               load the next browse page
  region <key>       select a region
  regions            list region keys
  suggest <prefix>   autocomplete names
  clear              back to the idle view
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    Random,
    Relative(i64),
    Browse(Option<String>),
    More,
    Region(String),
    Regions,
    Suggest(String),
    Clear,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" if !rest.is_empty() => ShellCommand::Search(rest.to_string()),
        "random" | "r" => ShellCommand::Random,
        "next" | "n" => ShellCommand::Relative(1),
        "prev" | "p" => ShellCommand::Relative(-1),
        "browse" | "b" => ShellCommand::Browse((!rest.is_empty()).then(|| rest.to_string())),
        "more" | "m" => ShellCommand::More,
        "region" if !rest.is_empty() => ShellCommand::Region(rest.to_string()),
        "regions" => ShellCommand::Regions,
        "suggest" if !rest.is_empty() => ShellCommand::Suggest(rest.to_string()),
        "clear" | "c" => ShellCommand::Clear,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "search" | "s" | "region" | "suggest" => return Err(format!("{verb} needs an argument")),
        _ => return Err(format!("unknown command: {verb}")),
    };
    Ok(Some(command))
}

pub fn region_listing(controller: &DexController) -> String {
    controller
        .regions()
        .iter()
        .map(|region| format!("  {:<8} {}", region.key, region.label))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run(controller: Arc<DexController>, startup_query: Option<String>) -> Result<()> {
    let mut stdout = io::stdout();
    controller.load_name_index().await;

    if let Some(query) = startup_query {
        info!("shell: startup query={query}");
        controller.search(&query).await;
        let state = controller.snapshot().await;
        stdout
            .write_all(render(&state, controller.regions()).as_bytes())
            .await?;
    }

    stdout.write_all(b"type `help` for commands\n").await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                stdout.write_all(format!("{message}\n").as_bytes()).await?;
                stdout.flush().await?;
                continue;
            }
        };

        let output = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => format!("{HELP}\n"),
            ShellCommand::Regions => format!("{}\n", region_listing(&controller)),
            ShellCommand::Suggest(prefix) => {
                let names = controller.suggest(&prefix, SUGGESTION_LIMIT).await;
                if names.is_empty() {
                    "no suggestions\n".to_string()
                } else {
                    format!("{}\n", names.join(", "))
                }
            }
            other => {
                apply(&controller, other).await;
                render(&controller.snapshot().await, controller.regions())
            }
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

async fn apply(controller: &DexController, command: ShellCommand) {
    match command {
        ShellCommand::Search(query) => controller.search(&query).await,
        ShellCommand::Random => controller.pick_random().await,
        ShellCommand::Relative(delta) => controller.browse_relative(delta).await,
        ShellCommand::Browse(region) => {
            let region = match region {
                Some(region) => region,
                None => controller.snapshot().await.region,
            };
            controller.enter_browse(&region).await;
        }
        ShellCommand::More => controller.load_more_browse().await,
        ShellCommand::Region(region) => controller.change_region(&region).await,
        ShellCommand::Clear => controller.clear().await,
        ShellCommand::Regions | ShellCommand::Suggest(_) | ShellCommand::Help | ShellCommand::Quit => {}
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
