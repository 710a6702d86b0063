use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod analyzer;
mod clipboard;
mod completion;
mod engine;
mod error;
mod loader;
mod models;
mod report;
mod sanitize;
mod session;
mod templates;

use clipboard::ChainedClipboard;
use completion::{CompletionProvider, Document, EditorIntegration, Position};
use engine::SuggestionEngine;
use loader::DataLoader;
use session::{ExportOutcome, NotesSession, Shortcut, ShortcutOutcome};
use templates::Theme;

#[derive(Parser)]
#[command(name = "notes-studio")]
#[command(about = "Teaching notes studio with corpus-driven autocomplete", long_about = None)]
struct Cli {
    /// Corpus document: a local .json/.csv file or an http(s) URL
    #[arg(long, global = true, default_value = "./scraped_notes.json")]
    corpus: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the corpus and print a summary
    Analyze {
        /// Print the full dataset as JSON instead of a markdown report
        #[arg(long)]
        json: bool,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Rank suggestions for the text typed so far
    Suggest {
        #[arg(long)]
        text: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long, default_value_t = 15)]
        limit: usize,
    },
    /// Run the completion provider against a notes document
    Complete {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        column: usize,
    },
    /// Interactive note-taking session with batch export
    Session,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notes_studio=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data_loader = DataLoader::new(loader::source_for(&cli.corpus));

    match cli.command {
        Commands::Analyze { json, limit } => {
            let dataset = data_loader.load_dataset().await;
            if json {
                let rendered = serde_json::to_string_pretty(&*dataset)
                    .context("failed to serialize dataset")?;
                println!("{rendered}");
            } else {
                print!("{}", report::build_report(&cli.corpus, &dataset, limit));
            }
        }
        Commands::Suggest {
            text,
            language,
            limit,
        } => {
            let dataset = data_loader.load_dataset().await;
            let mut engine = SuggestionEngine::new(Some(dataset));
            let suggestions = engine.get_suggestions(&text, text.chars().count() + 1, language.as_deref());

            if suggestions.is_empty() {
                println!("No suggestions for this context.");
                return Ok(());
            }
            for suggestion in suggestions.iter().take(limit) {
                println!("{:<8} {}", format!("{:?}", suggestion.kind), suggestion.label);
            }
        }
        Commands::Complete { file, line, column } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let dataset = data_loader.load_dataset().await;
            let mut integration = EditorIntegration::new(SuggestionEngine::new(Some(dataset)));
            integration.register();

            let items = integration.provide_completion_items(
                &Document::new(&text),
                Position {
                    line_number: line,
                    column,
                },
            );
            if items.is_empty() {
                println!("No completions at {}:{}.", line, column);
            }
            for item in items {
                println!("[{:?}] {} ({})", item.kind, item.insert_text, item.documentation);
            }
        }
        Commands::Session => run_session(&data_loader).await?,
    }

    Ok(())
}

const SESSION_HELP: &str = "\
Lines you type are appended to the current notes. Commands:
  :student NAME   set the student name
  :new            start from an empty note
  :template       reset the note to the observation template
  :notes          show the current note and statistics
  :obs [N]        list observations in the active category, or insert number N
  :next / :prev   cycle observation categories (Ctrl+Right / Ctrl+Left)
  :suggest        show completions for a new bullet
  :theme ID       switch theme
  :add            add the note to the batch (Ctrl+Enter)
  :export         copy the batch to the clipboard (Ctrl+E)
  :clear          clear the batch (Ctrl+R)
  :key KEY        run the Ctrl/Cmd shortcut for KEY (Enter, e, r, ArrowLeft, ArrowRight)
  :reload         reload the corpus and refresh suggestions
  :status         show session, corpus and suggestion cache state
  :quit";

async fn run_session(data_loader: &DataLoader) -> anyhow::Result<()> {
    let dataset = data_loader.load_dataset().await;
    let mut integration = EditorIntegration::new(SuggestionEngine::new(Some(dataset)));
    integration.register();
    let clipboard = ChainedClipboard::platform_default();
    let mut session = NotesSession::new();

    println!("{}", session.fall_back_to_plain_text());
    println!("{SESSION_HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let (command, argument) = match line.strip_prefix(':') {
            Some(rest) => {
                let mut parts = rest.splitn(2, ' ');
                (
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default().trim(),
                )
            }
            None => {
                session.append_line(&line);
                continue;
            }
        };

        let shortcut = match command {
            "key" => Shortcut::from_key(argument, true),
            "add" => Some(Shortcut::AddToBatch),
            "export" => Some(Shortcut::ExportBatch),
            "clear" => Some(Shortcut::ClearBatch),
            "next" => Some(Shortcut::NextTemplate),
            "prev" => Some(Shortcut::PreviousTemplate),
            _ => None,
        };
        if let Some(shortcut) = shortcut {
            match session.handle_shortcut(shortcut, &clipboard).await {
                Ok(outcome) => print_outcome(&outcome),
                Err(err) => println!("{err}"),
            }
            continue;
        }

        match command {
            "student" => session.set_student(argument),
            "new" => session.set_notes(""),
            "template" => session.set_notes(templates::NOTES_TEMPLATE),
            "notes" => {
                let stats = session.stats();
                println!("{}", session.notes());
                println!(
                    "-- {} words, {} concepts, {} languages, {} in batch",
                    stats.words,
                    stats.concepts,
                    stats.languages,
                    session.batch().len()
                );
            }
            "obs" => {
                let category = session.active_template();
                let observations = category.observations();
                match argument.parse::<usize>() {
                    Ok(index) if (1..=observations.len()).contains(&index) => {
                        session.insert_observation(observations[index - 1]);
                    }
                    Ok(_) => println!("No observation with that number."),
                    Err(_) => {
                        println!("{}:", category.label());
                        for (index, observation) in observations.iter().enumerate() {
                            println!("  {:>2}. {}", index + 1, observation);
                        }
                    }
                }
            }
            "suggest" => {
                let mut text = session.notes().to_string();
                text.push('\n');
                let document = Document::new(&text);
                let position = Position {
                    line_number: document.line_count(),
                    column: 1,
                };
                for item in integration.provide_completion_items(&document, position) {
                    println!("  {}", item.insert_text);
                }
            }
            "reload" => {
                data_loader.clear_cache().await;
                let dataset = data_loader.load_dataset().await;
                println!(
                    "Reloaded {} notes from {} students.",
                    dataset.stats.total_notes, dataset.stats.total_students
                );
                integration.engine_mut().update_data(dataset);
            }
            "status" => {
                let student = match session.current_student() {
                    "" => "(none)",
                    name => name,
                };
                println!(
                    "Student: {student}; editor: {:?}; exporting: {}; batch: {}",
                    session.editor_mode(),
                    session.is_processing(),
                    session.batch().len()
                );
                println!(
                    "Corpus: {}; loading: {}",
                    if data_loader.cached().is_some() { "cached" } else { "not cached" },
                    data_loader.is_loading()
                );
                println!(
                    "Completions: {}; cached contexts: {}",
                    if integration.is_registered() { "registered" } else { "disposed" },
                    integration.engine_mut().cached_contexts()
                );
            }
            "theme" => {
                session.set_theme(Theme::from_id(argument));
                println!("Theme: {}", session.theme().id());
            }
            "quit" | "q" => {
                integration.dispose();
                break;
            }
            _ => println!("{SESSION_HELP}"),
        }
    }

    Ok(())
}

fn print_outcome(outcome: &ShortcutOutcome) {
    match outcome {
        ShortcutOutcome::Added(entry) => {
            println!("Added {} ({} words) to the batch.", entry.name, entry.word_count)
        }
        ShortcutOutcome::Exported(ExportOutcome::Copied { count, method }) => {
            println!("Copied {count} student observation(s) to the clipboard via {method}.")
        }
        ShortcutOutcome::Exported(ExportOutcome::ManualCopy { payload, error }) => {
            println!("Copy to clipboard failed: {error}");
            println!("Copy the text below manually:\n\n{payload}\n");
        }
        ShortcutOutcome::Cleared(0) => println!("Batch already empty."),
        ShortcutOutcome::Cleared(count) => println!("Cleared {count} student observation(s)."),
        ShortcutOutcome::TemplateSelected(category) => println!("Observations: {}", category.label()),
    }
}
