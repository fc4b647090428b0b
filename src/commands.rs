//! Command handlers for mindvault CLI.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mindvault::dataset::{build_examples, write_jsonl};
use mindvault::sources::DemoData;
use mindvault::{Config, Error, SecondBrain};

use crate::output::*;

/// Default file name for `export`.
pub const DEFAULT_EXPORT_FILE: &str = "user_training.jsonl";

/// Commands supported by mindvault CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Answer a question from the loaded memories
    Ask {
        /// Question text
        question: String,

        /// Number of memories to retrieve (default: configured top_k)
        #[arg(short = 'k', long)]
        k: Option<usize>,
    },
    /// Show the nearest memories with their distances
    Search {
        /// Search query text
        query: String,

        /// Number of results (default: configured top_k)
        #[arg(short = 'k', long)]
        k: Option<usize>,
    },
    /// List loaded memories in insertion order
    List,
    /// Write a fine-tune dataset built from the demo data
    Export {
        /// Output JSONL path
        #[arg(short = 'o', long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
    Version,
}

/// Execute a CLI command.
pub fn execute(
    command: &Commands,
    brain: &SecondBrain,
    demo: Option<&DemoData>,
    config: &Config,
    json: bool,
) -> Result<ExitCode, Error> {
    match command {
        Commands::Ask { question, k } => {
            handle_ask(brain, question, k.unwrap_or(config.top_k), json)
        }
        Commands::Search { query, k } => {
            handle_search(brain, query, k.unwrap_or(config.top_k), json)
        }
        Commands::List => handle_list(brain, json),
        Commands::Export { output } => {
            let demo = demo.ok_or_else(|| Error::FileNotFound(config.data_dir.clone()))?;
            handle_export(demo, output, json)
        }
        Commands::Version => handle_version(json),
    }
}

fn handle_ask(brain: &SecondBrain, question: &str, k: usize, json: bool) -> Result<ExitCode, Error> {
    let answer = brain.ask(question, k)?;
    if json {
        print_json(&AskResponse {
            question: answer.question,
            context: answer.context,
            answer: answer.answer,
        });
    } else {
        println!("{}", answer.answer);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_search(brain: &SecondBrain, query: &str, k: usize, json: bool) -> Result<ExitCode, Error> {
    let hits = brain.search(query, k)?;
    if json {
        let results: Vec<SearchResultItem> = hits
            .into_iter()
            .map(|hit| SearchResultItem {
                id: hit.id,
                text: hit.text,
                distance: hit.distance,
                metadata: hit.metadata,
            })
            .collect();
        print_json(&SearchResponse { results });
    } else {
        for hit in hits {
            println!("{} [distance: {:.4}]\n  {}\n", hit.id, hit.distance, hit.text);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_list(brain: &SecondBrain, json: bool) -> Result<ExitCode, Error> {
    let memories = brain.list_memories();
    if json {
        let items: Vec<ListItem> = memories
            .into_iter()
            .enumerate()
            .map(|(id, text)| ListItem { id, text })
            .collect();
        print_json(&ListResponse { memories: items });
    } else if memories.is_empty() {
        println!("No memories loaded.");
    } else {
        for (id, text) in memories.iter().enumerate() {
            println!("{}: {}", id, text);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_export(demo: &DemoData, output: &Path, json: bool) -> Result<ExitCode, Error> {
    let examples = build_examples(demo);
    let written = write_jsonl(&examples, output)?;
    if json {
        print_json(&ExportResponse {
            status: "exported".to_string(),
            path: output.display().to_string(),
            examples: written,
        });
    } else {
        println!("Wrote {} training examples to {}", written, output.display());
    }
    Ok(ExitCode::SUCCESS)
}

pub fn handle_version(json: bool) -> Result<ExitCode, Error> {
    if json {
        print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "name": env!("CARGO_PKG_NAME")
        }));
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }
    Ok(ExitCode::SUCCESS)
}
