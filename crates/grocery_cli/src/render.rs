//! Terminal presentation of app snapshots
//!
//! The list and footer go to stdout; the loading indicator and error
//! messages go to stderr.

use grocery_core::{AppSnapshot, GroceryApp, Item, ItemRemote};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const LOADING_MESSAGE: &str = "Loading items....";
pub const EMPTY_MESSAGE: &str = "Your list is empty.";

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub show_footer: bool,
    pub json: bool,
}

impl Renderer {
    /// Print one frame
    pub fn draw(&self, snapshot: &AppSnapshot) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
            return Ok(());
        }

        if let Some(error) = &snapshot.fetch_error {
            eprintln!("Error: {}", error);
        }
        print!("{}", self.body(snapshot));
        Ok(())
    }

    /// Stdout part of a frame
    ///
    /// While loading or showing an error the list itself is hidden; the
    /// footer count is always shown.
    pub fn body(&self, snapshot: &AppSnapshot) -> String {
        let mut out = String::new();

        if snapshot.loading {
            out.push_str(LOADING_MESSAGE);
            out.push('\n');
        } else if snapshot.fetch_error.is_none() {
            if snapshot.items.is_empty() {
                out.push_str(EMPTY_MESSAGE);
                out.push('\n');
            }
            for item in &snapshot.items {
                out.push_str(&item_line(item));
                out.push('\n');
            }
        }

        if self.show_footer {
            out.push_str(&snapshot.footer_label());
            out.push('\n');
        }
        out
    }
}

pub fn item_line(item: &Item) -> String {
    let mark = if item.checked { "x" } else { " " };
    format!("[{}] {:>3}  {}", mark, item.id, item.item)
}

/// Run the startup load behind a spinner
pub async fn start_with_spinner<R: ItemRemote>(
    app: &mut GroceryApp<R>,
) -> anyhow::Result<AppSnapshot> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(LOADING_MESSAGE);
    pb.enable_steady_tick(Duration::from_millis(80));

    let snapshot = app.start().await;

    pb.finish_and_clear();
    Ok(snapshot)
}
