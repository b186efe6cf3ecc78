use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use copyforge::cli;
use copyforge::compose::PromptComposer;
use copyforge::config::ConsoleConfig;
use copyforge::knowledge::{self, KnowledgeStore, RefMode};
use copyforge::selection::SelectionState;
use copyforge::snapshot::SnapshotStore;
use copyforge::taxonomy::{Axis, Taxonomy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "copyforge")]
#[command(version, about = "Marketing-content authoring console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true, default_value = ".copyforge.json")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the instruction document from the current state
    Compose {
        /// Write the document to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Emit a JSON history record instead of plain text
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },

    /// List catalog options, for one axis or all of them
    Options {
        /// Axis to list (e.g. brand-tone); all axes when omitted
        axis: Option<String>,
    },

    /// Choose an option on an axis (multi-select axes toggle membership)
    Select { axis: String, id: String },

    /// Drop the choice on an axis, falling back to its default
    Clear { axis: String },

    /// Set a free-text field (see `copyforge set --help` for names)
    Set {
        #[arg(value_parser = clap::builder::PossibleValuesParser::new(cli::set_field_names().iter().copied()))]
        field: String,
        value: String,
    },

    /// Flip a boolean flag
    Toggle {
        #[arg(value_parser = clap::builder::PossibleValuesParser::new(cli::toggle_flag_names().iter().copied()))]
        flag: String,
    },

    /// Manage knowledge entries
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommands,
    },

    /// Inspect or edit the chunk layer of a knowledge entry
    Chunks {
        /// Knowledge item id
        id: String,

        /// Merge chunk at this index with its successor
        #[arg(long, conflicts_with = "split")]
        merge: Option<usize>,

        /// Split the chunk at this index
        #[arg(long)]
        split: Option<usize>,
    },

    /// Rank knowledge entries against a query
    Retrieve {
        query: String,

        /// Seed the jitter term for reproducible rankings
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Manage named state snapshots
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
}

#[derive(Subcommand)]
enum KnowledgeCommands {
    /// Add an entry
    Add {
        title: String,
        content: String,

        /// strict entries become mandatory constraints; smart entries
        /// contextual reference
        #[arg(long, default_value = "smart")]
        mode: String,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List entries
    List,
    /// Show one entry with its chunks
    Show { id: String },
    /// Archive an entry (kept, but invisible to retrieval and composition)
    Archive { id: String },
    /// Un-archive an entry
    Restore { id: String },
    /// Delete an entry permanently
    Remove { id: String },
}

#[derive(Subcommand)]
enum SnapshotCommands {
    /// Save the current state under a name
    Save { name: String },
    /// List snapshots, newest first
    List,
    /// Restore a snapshot into the current state
    Load { id: String },
    /// Delete a snapshot
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli_args = Cli::parse();

    // Initialize tracing
    let filter_layer = if cli_args.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else if cli_args.verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("copyforge v{}", env!("CARGO_PKG_VERSION"));

    let config = ConsoleConfig::load(&cli_args.config)?;
    let taxonomy = Taxonomy::builtin();

    match cli_args.command {
        Commands::Compose { output, json } => cmd_compose(&config, &taxonomy, output, json),
        Commands::Options { axis } => cmd_options(&taxonomy, axis),
        Commands::Select { axis, id } => cmd_select(&config, &taxonomy, &axis, &id),
        Commands::Clear { axis } => cmd_clear(&config, &axis),
        Commands::Set { field, value } => cmd_set(&config, &field, &value),
        Commands::Toggle { flag } => cmd_toggle(&config, &flag),
        Commands::Knowledge { command } => cmd_knowledge(&config, command),
        Commands::Chunks { id, merge, split } => cmd_chunks(&config, &id, merge, split),
        Commands::Retrieve { query, seed } => cmd_retrieve(&config, &query, seed),
        Commands::Snapshot { command } => cmd_snapshot(&config, &taxonomy, command),
    }
}

fn cmd_compose(
    config: &ConsoleConfig,
    taxonomy: &Taxonomy,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let state = cli::load_state_file(&config.storage.state_file, &config.defaults)?;
    let store = KnowledgeStore::load(&config.storage.knowledge_file)?;

    let doc = PromptComposer::new().compose(&state, taxonomy, &store);
    if json {
        // History-record shape consumed by downstream persistence
        let record = serde_json::json!({
            "prompt_content": doc,
            "settings": state,
            "created_at": chrono::Utc::now(),
        });
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }
    match output {
        Some(path) => {
            std::fs::write(&path, &doc)?;
            println!("{} {}", "Wrote".bright_green(), path.display());
        }
        None => println!("{doc}"),
    }
    Ok(())
}

fn cmd_options(taxonomy: &Taxonomy, axis: Option<String>) -> Result<()> {
    let axes = match axis {
        Some(code) => vec![Axis::from_str(&code)?],
        None => Axis::all(),
    };

    for axis in axes {
        let marker = if axis.is_multi() { " (multi)" } else { "" };
        println!();
        println!("{}{}", axis.to_string().bright_cyan().bold(), marker.dimmed());
        if !axis.is_catalog_backed() {
            println!("  {}", "ids come from the knowledge store".dimmed());
            continue;
        }
        for opt in taxonomy.options(axis) {
            println!("  {:24} {}", opt.id.bright_yellow(), opt.name);
        }
    }
    Ok(())
}

/// Load state, apply one mutation, save state
fn with_state(
    config: &ConsoleConfig,
    mutate: impl FnOnce(&mut SelectionState) -> Result<()>,
) -> Result<()> {
    let mut state = cli::load_state_file(&config.storage.state_file, &config.defaults)?;
    mutate(&mut state)?;
    cli::save_state_file(&config.storage.state_file, &state)
}

fn cmd_select(config: &ConsoleConfig, taxonomy: &Taxonomy, axis: &str, id: &str) -> Result<()> {
    let axis = Axis::from_str(axis)?;
    with_state(config, |state| cli::apply_select(state, taxonomy, axis, id))?;
    println!("{} {} = {}", "Selected".bright_green(), axis, id);
    Ok(())
}

fn cmd_clear(config: &ConsoleConfig, axis: &str) -> Result<()> {
    let axis = Axis::from_str(axis)?;
    with_state(config, |state| {
        cli::apply_clear(state, axis);
        Ok(())
    })?;
    println!("{} {}", "Cleared".bright_green(), axis);
    Ok(())
}

fn cmd_set(config: &ConsoleConfig, field: &str, value: &str) -> Result<()> {
    with_state(config, |state| cli::apply_set(state, field, value))?;
    println!("{} {}", "Set".bright_green(), field);
    Ok(())
}

fn cmd_toggle(config: &ConsoleConfig, flag: &str) -> Result<()> {
    let mut new_value = false;
    with_state(config, |state| {
        new_value = cli::apply_toggle(state, flag)?;
        Ok(())
    })?;
    println!(
        "{} {} -> {}",
        "Toggled".bright_green(),
        flag,
        if new_value { "on" } else { "off" }
    );
    Ok(())
}

fn cmd_knowledge(config: &ConsoleConfig, command: KnowledgeCommands) -> Result<()> {
    let path = &config.storage.knowledge_file;
    let mut store = KnowledgeStore::load(path)?;

    match command {
        KnowledgeCommands::Add {
            title,
            content,
            mode,
            tags,
        } => {
            let ref_mode = match mode.as_str() {
                "strict" => RefMode::Strict,
                _ => RefMode::Smart,
            };
            let id = store.insert(&title, &content, ref_mode).id.clone();
            if let Some(tags) = tags {
                let item = store.get_mut(&id).expect("item just inserted");
                for tag in tags.split(',') {
                    let tag = tag.trim();
                    if !tag.is_empty() {
                        item.tags.insert(tag.to_string());
                    }
                }
            }
            store.save(path)?;
            println!("{} {}", "Added".bright_green(), id);
        }
        KnowledgeCommands::List => {
            for item in store.items() {
                let flag = match (item.is_archived, item.ref_mode) {
                    (true, _) => "archived".dimmed(),
                    (false, RefMode::Strict) => "strict".bright_red(),
                    (false, RefMode::Smart) => "smart".bright_blue(),
                };
                println!("{}  [{}] {}", item.id.bright_yellow(), flag, item.title);
            }
        }
        KnowledgeCommands::Show { id } => {
            let item = store
                .get(&id)
                .ok_or_else(|| copyforge::KnowledgeError::NotFound(id.clone()))?;
            println!("{}", item.title.bold());
            println!("{}", item.content);
            if let Some(chunks) = &item.chunks {
                println!();
                for chunk in chunks {
                    println!(
                        "  {} [{}..{}] {}",
                        chunk.id.bright_yellow(),
                        chunk.start_line,
                        chunk.end_line,
                        chunk.text
                    );
                }
            }
        }
        KnowledgeCommands::Archive { id } => {
            store.set_archived(&id, true)?;
            store.save(path)?;
            println!("{} {}", "Archived".bright_green(), id);
        }
        KnowledgeCommands::Restore { id } => {
            store.set_archived(&id, false)?;
            store.save(path)?;
            println!("{} {}", "Restored".bright_green(), id);
        }
        KnowledgeCommands::Remove { id } => {
            store.remove(&id)?;
            store.save(path)?;
            println!("{} {}", "Removed".bright_green(), id);
        }
    }
    Ok(())
}

fn cmd_chunks(
    config: &ConsoleConfig,
    id: &str,
    merge_at: Option<usize>,
    split_at: Option<usize>,
) -> Result<()> {
    let path = &config.storage.knowledge_file;
    let mut store = KnowledgeStore::load(path)?;
    let item = store
        .get_mut(id)
        .ok_or_else(|| copyforge::KnowledgeError::NotFound(id.to_string()))?;

    let chunks = item
        .chunks
        .clone()
        .unwrap_or_else(|| knowledge::chunk(&item.content));

    let edited = if let Some(i) = merge_at {
        knowledge::merge(&chunks, i)
    } else if let Some(i) = split_at {
        knowledge::split(&chunks, i)
    } else {
        chunks
    };

    for chunk in &edited {
        println!(
            "{} [{}..{}] {}",
            chunk.id.bright_yellow(),
            chunk.start_line,
            chunk.end_line,
            chunk.text
        );
    }

    if merge_at.is_some() || split_at.is_some() {
        item.chunks = Some(edited);
        store.save(path)?;
    }
    Ok(())
}

fn cmd_retrieve(config: &ConsoleConfig, query: &str, seed: Option<u64>) -> Result<()> {
    let store = KnowledgeStore::load(&config.storage.knowledge_file)?;
    let mut hits = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            knowledge::retrieve_with_rng(query, &store, &mut rng)
        }
        None => knowledge::retrieve(query, &store),
    };
    hits.truncate(config.defaults.retrieval_top_n);

    if hits.is_empty() {
        println!("{}", "No matches".dimmed());
        return Ok(());
    }
    for hit in hits {
        println!(
            "{:.2}  {}  {}",
            hit.score,
            hit.title.bold(),
            hit.excerpt.dimmed()
        );
    }
    Ok(())
}

fn cmd_snapshot(
    config: &ConsoleConfig,
    taxonomy: &Taxonomy,
    command: SnapshotCommands,
) -> Result<()> {
    let path = &config.storage.snapshot_file;
    let mut store = SnapshotStore::load_file(path)?;

    match command {
        SnapshotCommands::Save { name } => {
            let state = cli::load_state_file(&config.storage.state_file, &config.defaults)?;
            let id = store.save(&name, &state)?;
            store.save_file(path)?;
            println!("{} {} ({})", "Saved".bright_green(), name, id);
        }
        SnapshotCommands::List => {
            for snapshot in store.list() {
                println!(
                    "{}  {}  {}",
                    snapshot.id.bright_yellow(),
                    snapshot.created_at.format("%Y-%m-%d %H:%M"),
                    snapshot.name
                );
            }
        }
        SnapshotCommands::Load { id } => {
            let state = store.load(&id, taxonomy)?;
            cli::save_state_file(&config.storage.state_file, &state)?;
            println!("{} {}", "Loaded".bright_green(), id);
        }
        SnapshotCommands::Delete { id } => {
            store.delete(&id)?;
            store.save_file(path)?;
            println!("{} {}", "Deleted".bright_green(), id);
        }
    }
    Ok(())
}
