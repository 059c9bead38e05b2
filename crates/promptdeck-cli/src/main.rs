use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use promptdeck::{
    CopyState, PromptDeck, PromptdeckError, StoreConfig, TemplateId, TemplateStore,
    config::DEFAULT_FILE,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "promptdeck")]
#[command(
    author,
    version,
    about = "Reusable text templates with {today} and {input} placeholders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    storage: StorageArgs,

    /// Enable debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct StorageArgs {
    /// Local JSON file holding the templates
    #[arg(long, env = "PROMPTDECK_FILE", default_value = DEFAULT_FILE, global = true)]
    file: PathBuf,

    /// Base URL of a promptdeck server (takes precedence over --file)
    #[arg(long, env = "PROMPTDECK_REMOTE_URL", global = true)]
    remote: Option<String>,
}

impl StorageArgs {
    fn config(&self) -> StoreConfig {
        match &self.remote {
            Some(url) => StoreConfig::remote(url.clone()),
            None => StoreConfig::file(self.file.clone()),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List stored templates, newest first
    List,

    /// Store a new template (reads stdin when BODY is omitted)
    Add { body: Option<String> },

    /// Delete a template by id
    Delete { id: i64 },

    /// Resolve a stored template and print the result
    Copy {
        id: i64,

        /// Values for the {input} placeholders, in order; missing ones are prompted for
        #[arg(short, long = "input")]
        inputs: Vec<String>,
    },

    /// Resolve an ad-hoc template without storing it
    Resolve {
        template: String,

        #[arg(short, long = "input")]
        inputs: Vec<String>,
    },

    /// Write all templates to a dated JSON file
    Export {
        /// Directory to write the export into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Append the templates from an exported JSON file
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "promptdeck=debug,promptdeck_cli=debug"
    } else {
        "promptdeck=warn,promptdeck_cli=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::List => list(&open_deck(&cli.storage).await?),
        Commands::Add { body } => {
            let body = match body {
                Some(body) => body,
                None => io::read_to_string(io::stdin()).context("Failed to read stdin")?,
            };
            let mut deck = open_deck(&cli.storage).await?;
            let added = deck.on_add(&body).await?;
            report_persisted(&added.persisted);
            println!("Added template {}", added.value.id);
        }
        Commands::Delete { id } => {
            let mut deck = open_deck(&cli.storage).await?;
            let deleted = deck.on_delete(TemplateId(id)).await;
            report_persisted(&deleted.persisted);
            if deleted.value {
                println!("Deleted template {}", id);
            } else {
                println!("No template with id {}", id);
            }
        }
        Commands::Copy { id, inputs } => {
            let mut deck = open_deck(&cli.storage).await?;
            let text = copy(&mut deck, TemplateId(id), inputs)?;
            println!("{}", text);
        }
        Commands::Export { dir } => {
            let deck = open_deck(&cli.storage).await?;
            let export = deck.on_export()?;
            let path = dir.join(&export.file_name);
            tokio::fs::write(&path, export.content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} templates to {}",
                deck.templates().len(),
                path.display()
            );
        }
        Commands::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut deck = open_deck(&cli.storage).await?;
            let imported = deck.on_import(&content).await?;
            report_persisted(&imported.persisted);
            println!("Imported {} templates", imported.value);
        }
        Commands::Resolve { template, inputs } => {
            println!("{}", promptdeck::resolve(&template, inputs.as_slice()));
        }
    }

    Ok(())
}

async fn open_deck(args: &StorageArgs) -> Result<PromptDeck> {
    let config = args.config();
    debug!("Using storage {:?}", config.location);
    let storage = config.open_storage()?;
    let store = TemplateStore::open(storage)
        .await
        .context("Failed to load templates")?;
    Ok(PromptDeck::new(store))
}

fn list(deck: &PromptDeck) {
    if deck.templates().is_empty() {
        println!("No templates yet. Add one with `promptdeck add`.");
        return;
    }

    for template in deck.templates() {
        let date = template.created_at.date();
        let mut line = format!(
            "{:>14}  {:04}-{:02}-{:02}  {}",
            template.id,
            date.year(),
            u8::from(date.month()),
            date.day(),
            template.title()
        );
        if template.line_count() > 1 {
            line.push_str(&format!(" (+{} lines)", template.line_count() - 1));
        }
        let inputs = template.required_input_count();
        if inputs > 0 {
            line.push_str(&format!("  [{} inputs]", inputs));
        }
        println!("{}", line);
    }
}

/// Run one copy action: take the given values, prompt for the rest
fn copy(deck: &mut PromptDeck, id: TemplateId, inputs: Vec<String>) -> Result<String> {
    let count = match deck.on_copy_requested(id)? {
        CopyState::Resolved(text) => return Ok(text.clone()),
        CopyState::CollectingInputs { inputs, .. } => inputs.len(),
        CopyState::Idle => bail!("Copy did not start"),
    };

    for (index, value) in inputs.into_iter().take(count).enumerate() {
        deck.on_input(index, value)?;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match deck.on_confirm() {
            Ok(text) => return Ok(text),
            Err(PromptdeckError::MissingInputs { fields }) => {
                for field in fields {
                    eprint!("Input {}: ", field);
                    io::stderr().flush()?;

                    let Some(line) = lines.next() else {
                        deck.on_cancel();
                        warn!("Copy cancelled: stdin closed");
                        return Err(anyhow!("Cancelled: not all inputs were provided"));
                    };
                    deck.on_input(field - 1, line?)?;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn report_persisted(persisted: &promptdeck::Result<()>) {
    if let Err(e) = persisted {
        warn!("Changes kept for this session only: {}", e);
        eprintln!("warning: {}", e);
    }
}
