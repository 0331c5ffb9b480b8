//! Command-line front end for the inkdraft editing core.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use inkdraft_core::editor::{Insertion, MarkdownFormat, Selection, ShortcutAction, SHORTCUTS};
use inkdraft_core::preview::{extract_headings, render_html_with, transform, RenderOptions};
use inkdraft_core::store::{ContentStore, FileStore};
use inkdraft_core::Config;
use serde_json::json;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkdraft", about = "Markdown draft tools", version)]
struct Cli {
    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the preview of a draft (transformed markdown or HTML)
    Preview {
        /// Draft file; defaults to INKDRAFT_DRAFT_PATH
        file: Option<PathBuf>,
        /// Render HTML instead of transformed markdown
        #[arg(long)]
        html: bool,
    },
    /// List headings with their anchor ids
    Toc { file: Option<PathBuf> },
    /// Apply one formatting action to a char range
    Format {
        file: Option<PathBuf>,
        /// Formatting action, e.g. bold, italic, link, code-block
        #[arg(short, long)]
        action: MarkdownFormat,
        /// Selection start (char offset)
        #[arg(long, default_value = "0")]
        start: usize,
        /// Selection end (char offset); defaults to `start`
        #[arg(long)]
        end: Option<usize>,
        /// Write the result back to the file
        #[arg(short, long)]
        write: bool,
    },
    /// Print the keyboard shortcut table
    Shortcuts,
}

fn draft_store(file: Option<PathBuf>, config: &Config) -> FileStore {
    FileStore::new(file.unwrap_or_else(|| PathBuf::from(&config.draft_path)))
}

fn load_draft(store: &FileStore) -> anyhow::Result<String> {
    store
        .load()
        .with_context(|| format!("Failed to read draft '{}'", store.path().display()))?
        .with_context(|| format!("Draft '{}' does not exist", store.path().display()))
}

fn format_toc_output(markdown: &str, as_json: bool) -> String {
    let headings = extract_headings(markdown);
    if as_json {
        return serde_json::to_string_pretty(&headings).unwrap_or_else(|_| "[]".to_string());
    }
    headings
        .iter()
        .map(|heading| {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            format!("{}- [{}](#{})", indent, heading.text, heading.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_shortcuts_output(as_json: bool) -> String {
    if as_json {
        let rows: Vec<_> = SHORTCUTS
            .iter()
            .map(|binding| {
                json!({
                    "chord": binding.chord().to_string(),
                    "action": binding.action,
                })
            })
            .collect();
        return serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string());
    }
    SHORTCUTS
        .iter()
        .map(|binding| {
            let action = match binding.action {
                ShortcutAction::Format(format) => format.label(),
                ShortcutAction::Undo => "Undo",
                ShortcutAction::Redo => "Redo",
            };
            format!("{:<14}{}", binding.chord().to_string(), action)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn apply_format(
    markdown: &str,
    action: MarkdownFormat,
    start: usize,
    end: Option<usize>,
) -> Insertion {
    action.apply(markdown, Selection::new(start, end.unwrap_or(start)))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkdraft=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "inkdraft", &mut io::stdout());
        }
        Commands::Preview { file, html } => {
            let store = draft_store(file, &config);
            let markdown = load_draft(&store)?;
            if html {
                let options = RenderOptions {
                    expand_embeds: config.render_embeds,
                };
                println!("{}", render_html_with(&markdown, options));
            } else {
                print!("{}", transform(&markdown));
            }
        }
        Commands::Toc { file } => {
            let store = draft_store(file, &config);
            let markdown = load_draft(&store)?;
            println!("{}", format_toc_output(&markdown, cli.json));
        }
        Commands::Format {
            file,
            action,
            start,
            end,
            write,
        } => {
            let store = draft_store(file, &config);
            let markdown = load_draft(&store)?;
            let result = apply_format(&markdown, action, start, end);
            if write {
                store
                    .persist(&result.buffer)
                    .with_context(|| format!("Failed to write '{}'", store.path().display()))?;
                tracing::info!(action = %action, cursor = result.cursor, "draft updated");
            }
            if cli.json {
                println!(
                    "{}",
                    json!({ "buffer": result.buffer, "cursor": result.cursor, "written": write })
                );
            } else if write {
                println!("cursor: {}", result.cursor);
            } else {
                print!("{}", result.buffer);
            }
        }
        Commands::Shortcuts => println!("{}", format_shortcuts_output(cli.json)),
    }

    Ok(())
}
