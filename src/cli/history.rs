//! History command handler
//!
//! Lists, shows and removes places saved by `explore`. Entries are addressed
//! by id; any unambiguous prefix of the id works.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::history::{History, HistoryItem};
use chrono::{DateTime, Local};
use clap::{Args, Subcommand};

/// History command arguments
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: Option<HistoryCommand>,

    /// Number of entries to list when no subcommand is given
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved places, newest first
    List {
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// Print one saved place
    Show {
        id: String,

        /// Output format (defaults to explore.format)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Remove one saved place
    Delete { id: String },
    /// Remove every saved place
    Clear,
}

/// Run the history command
pub fn run(args: HistoryArgs) -> Result<()> {
    let command = args.command.unwrap_or(HistoryCommand::List { count: args.count });

    match command {
        HistoryCommand::List { count } => {
            let history = History::load()?;
            print!("{}", render_list(&history, count));
            Ok(())
        }
        HistoryCommand::Show { id, format } => show(&id, format),
        HistoryCommand::Delete { id } => {
            let mut history = History::load()?;
            let full_id = resolve_id(&history, &id)?.id.clone();
            history.remove(&full_id);
            history.save()?;
            println!("Deleted {}", full_id);
            Ok(())
        }
        HistoryCommand::Clear => {
            let mut history = History::load()?;
            let count = history.len();
            history.clear();
            history.save()?;
            println!("Removed {} saved places", count);
            Ok(())
        }
    }
}

/// Look up an entry by id prefix; ambiguous prefixes are an error
fn resolve_id<'a>(history: &'a History, prefix: &str) -> Result<&'a HistoryItem> {
    let mut matches = history.entries().iter().filter(|e| e.id.starts_with(prefix));

    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry),
        (Some(_), Some(_)) => Err(Error::Config(format!(
            "Id prefix '{}' matches more than one entry",
            prefix
        ))),
        (None, _) => Err(Error::Config(format!("No saved place with id {}", prefix))),
    }
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn render_list(history: &History, count: usize) -> String {
    if history.is_empty() {
        return "No saved places.\n".to_string();
    }

    let mut out = String::new();
    for entry in history.recent(count) {
        let short_id: String = entry.id.chars().take(8).collect();
        let region = entry
            .info
            .region
            .map(|r| format!(", {}", r))
            .unwrap_or_default();
        out.push_str(&format!(
            "{}  {} ({}{})\n          {:.5}, {:.5}  {}\n",
            short_id,
            entry.info.title,
            entry.info.location_type.label(),
            region,
            entry.coords.lat,
            entry.coords.lng,
            format_timestamp(entry.timestamp)
        ));
    }
    if history.len() > count {
        out.push_str(&format!("... {} older\n", history.len() - count));
    }
    out
}

fn show(id: &str, format: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let history = History::load()?;
    let entry = resolve_id(&history, id)?;

    let name = format.unwrap_or_else(|| config.explore.format.clone());
    let formatter =
        get_formatter(&name).ok_or_else(|| Error::Config(format!("Unknown format: {}", name)))?;

    println!("{}", formatter.format(&entry.info, &config)?.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::sample_location;
    use tempfile::TempDir;

    fn history_with(ids: &[&str]) -> (History, TempDir) {
        let temp = TempDir::new().unwrap();
        let mut history = History::load_from(temp.path().join("h.json")).unwrap();
        for id in ids {
            let mut item = HistoryItem::from_location(sample_location());
            item.id = id.to_string();
            history.add(item);
        }
        (history, temp)
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let (history, _temp) = history_with(&["ab12", "cd34"]);
        assert_eq!(resolve_id(&history, "cd").unwrap().id, "cd34");
        assert_eq!(resolve_id(&history, "ab12").unwrap().id, "ab12");
    }

    #[test]
    fn test_resolve_ambiguous_or_missing() {
        let (history, _temp) = history_with(&["ab12", "ab34"]);
        assert!(resolve_id(&history, "ab").is_err());
        assert!(resolve_id(&history, "zz").is_err());
    }

    #[test]
    fn test_render_list() {
        let (history, _temp) = history_with(&["aaaaaaaa-1", "bbbbbbbb-2", "cccccccc-3"]);
        let out = render_list(&history, 2);

        assert!(out.starts_with("cccccccc  Turaidas pils (Pils, Vidzeme)"));
        assert!(out.contains("57.18360, 24.84970"));
        assert!(!out.contains("aaaaaaaa"));
        assert!(out.ends_with("... 1 older\n"));
    }

    #[test]
    fn test_render_empty() {
        let (history, _temp) = history_with(&[]);
        assert_eq!(render_list(&history, 10), "No saved places.\n");
    }
}
