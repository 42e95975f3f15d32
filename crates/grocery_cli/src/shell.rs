//! Interactive session
//!
//! Keeps one `GroceryApp` alive across commands read from stdin, so ids,
//! the search text and the last sync error persist the way they do in a
//! long-running UI. Every published snapshot is redrawn.

use grocery_core::{GroceryApp, ItemId, ItemRemote};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::render::{self, Renderer};

const HELP: &str = "\
Commands:
  add <text>     Add an item
  check <id>     Check or uncheck an item
  delete <id>    Delete an item
  search [text]  Filter the list (no text clears the filter)
  list           Redraw the list
  help           Show this help
  quit           Leave the shell";

/// One parsed input line
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Check(ItemId),
    Delete(ItemId),
    Search(String),
    List,
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let parse_id = |rest: &str| -> Result<ItemId, String> {
        rest.parse()
            .map_err(|_| format!("'{}' is not an item id", rest))
    };

    match verb {
        "" => Ok(ShellCommand::Empty),
        "add" => Ok(ShellCommand::Add(rest.to_string())),
        "check" | "toggle" => parse_id(rest).map(ShellCommand::Check),
        "delete" | "del" | "rm" => parse_id(rest).map(ShellCommand::Delete),
        "search" => Ok(ShellCommand::Search(rest.to_string())),
        "list" | "ls" => Ok(ShellCommand::List),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}

pub async fn run<R: ItemRemote>(mut app: GroceryApp<R>, renderer: Renderer) -> anyhow::Result<()> {
    render::start_with_spinner(&mut app).await?;
    renderer.draw(&app.snapshot())?;

    // Subscribe after the startup frame so the spinner stands in for "Loading"
    app.subscribe(move |snapshot| {
        if let Err(e) = renderer.draw(snapshot) {
            tracing::warn!("Failed to draw frame: {}", e);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let mut stderr = tokio::io::stderr();

    loop {
        stderr.write_all(b"> ").await?;
        stderr.flush().await?;

        let Some(bytes) = lines.next_segment().await? else {
            break;
        };
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(_) => {
                eprintln!("Error: input is not valid UTF-8");
                continue;
            }
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };

        let result = match command {
            ShellCommand::Add(text) if text.is_empty() => continue,
            ShellCommand::Add(text) => app.add_item(&text).await.map(drop),
            ShellCommand::Check(id) => app.toggle_checked(id).await.map(drop),
            ShellCommand::Delete(id) => app.delete_item(id).await.map(drop),
            ShellCommand::Search(query) => {
                app.set_search(&query);
                Ok(())
            }
            ShellCommand::List => {
                renderer.draw(&app.snapshot())?;
                Ok(())
            }
            ShellCommand::Help => {
                eprintln!("{}", HELP);
                Ok(())
            }
            ShellCommand::Quit => break,
            ShellCommand::Empty => continue,
        };

        if let Err(e) = result {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}
