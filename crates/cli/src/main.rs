//! ResearchChain command line interface
//!
//! Submits papers through the publication flow and inspects the registry.

mod settings;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use researchchain_files::{ContentKind, ContentStore, LocalContentStore, PinataContentStore};
use researchchain_publisher::{
    list_publications, view_publication, PaperFile, PublicationFlow, SubmissionForm,
};
use researchchain_registry::MemoryPublicationRegistry;
use researchchain_reviewers::ReviewerDirectory;
use researchchain_types::{AccessMode, Address, Amount, Cid, PublicationId};
use researchchain_wallet::{StaticWalletProvider, WalletSession};
use settings::{CliConfig, ContentBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "researchchain")]
#[command(about = "ResearchChain publication submission and registry CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./researchchain.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a paper, register it and optionally set its access price
    Submit(SubmitCommand),
    /// Show a registered publication and its effective access policy
    Show {
        /// Publication id
        id: PublicationId,
    },
    /// List publications by publisher, newest first
    List {
        /// Publisher address (defaults to the configured account)
        #[arg(long)]
        publisher: Option<Address>,
    },
    /// Download content by CID or gateway URL
    Fetch {
        /// CID or gateway URL
        cid: Cid,
        /// Output file
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
    /// Pin a JSON review document
    UploadReview {
        /// Path to the review JSON document
        file: PathBuf,
    },
    /// Suggest reviewers whose expertise matches the given keywords
    MatchReviewers {
        /// JSON array of {"name", "keywords"} objects
        #[arg(long, value_name = "PATH")]
        reviewers: PathBuf,
        /// Comma separated keywords
        #[arg(long)]
        keywords: String,
    },
}

#[derive(Args)]
struct SubmitCommand {
    /// Paper title
    #[arg(long)]
    title: String,
    /// Paper abstract
    #[arg(long = "abstract")]
    abstract_text: String,
    /// Comma separated keywords
    #[arg(long, default_value = "")]
    keywords: String,
    /// Paper file to upload
    #[arg(long, value_name = "PATH")]
    file: PathBuf,
    /// Access mode: open or paid
    #[arg(long)]
    access: AccessMode,
    /// Access price in RCT (required for paid access)
    #[arg(long)]
    price: Option<Amount>,
    /// Additional author address (repeatable)
    #[arg(long = "author")]
    authors: Vec<Address>,
    /// Submitting account (defaults to the configured account)
    #[arg(long)]
    from: Option<Address>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    settings::init_logging(&config)?;

    match cli.command {
        Commands::Submit(cmd) => submit(&config, cmd).await,
        Commands::Show { id } => show(&config, id).await,
        Commands::List { publisher } => list(&config, publisher).await,
        Commands::Fetch { cid, out } => fetch(&config, &cid, &out).await,
        Commands::UploadReview { file } => upload_review(&config, &file).await,
        Commands::MatchReviewers {
            reviewers,
            keywords,
        } => match_reviewers(&reviewers, &keywords).await,
    }
}

async fn open_store(config: &CliConfig) -> Result<Arc<dyn ContentStore>> {
    let store: Arc<dyn ContentStore> = match config.content_backend {
        ContentBackend::Local => Arc::new(
            LocalContentStore::open(&config.content_dir)
                .await
                .with_context(|| {
                    format!("failed to open content dir {}", config.content_dir.display())
                })?,
        ),
        ContentBackend::Pinata => Arc::new(PinataContentStore::new(config.pinata()?)?),
    };
    Ok(store)
}

async fn open_registry(config: &CliConfig) -> Result<Arc<MemoryPublicationRegistry>> {
    let registry = MemoryPublicationRegistry::load_or_default(&config.registry_snapshot)
        .await
        .with_context(|| {
            format!(
                "failed to load registry snapshot {}",
                config.registry_snapshot.display()
            )
        })?;
    Ok(Arc::new(registry))
}

fn account(config: &CliConfig, explicit: Option<Address>) -> Result<Address> {
    match explicit.or(config.account) {
        Some(account) => Ok(account),
        None => bail!("no account given; pass --from or set `account` in the configuration"),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn submit(config: &CliConfig, cmd: SubmitCommand) -> Result<()> {
    let submitter = account(config, cmd.from)?;
    let bytes = tokio::fs::read(&cmd.file)
        .await
        .with_context(|| format!("failed to read paper file {}", cmd.file.display()))?;
    let name = cmd
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "paper".to_string());

    let form = SubmissionForm {
        title: cmd.title,
        abstract_text: cmd.abstract_text,
        keywords: SubmissionForm::parse_keywords(&cmd.keywords),
        file: Some(PaperFile::new(name, bytes)),
        access_mode: Some(cmd.access),
        price: cmd.price,
        additional_authors: cmd.authors,
    };

    let provider = StaticWalletProvider::new(submitter, config.chain_id);
    let session = WalletSession::connect(&provider, config.gas).await?;

    let store = open_store(config).await?;
    let registry = open_registry(config).await?;
    let flow = PublicationFlow::new(store, registry.clone());

    let report = flow.submit(&session, form).await?;
    registry
        .save(&config.registry_snapshot)
        .await
        .context("publication registered but the registry snapshot could not be saved")?;

    print_json(&report)?;
    if let Some(warning) = report.warning() {
        eprintln!(
            "warning: publication {} was registered but is free to read: {warning}",
            report.publication.id
        );
    }
    Ok(())
}

async fn show(config: &CliConfig, id: PublicationId) -> Result<()> {
    let registry = open_registry(config).await?;
    let view = view_publication(registry.as_ref(), id).await?;
    print_json(&view)
}

async fn list(config: &CliConfig, publisher: Option<Address>) -> Result<()> {
    let publisher = account(config, publisher)?;
    let registry = open_registry(config).await?;
    let views = list_publications(registry.as_ref(), &publisher).await?;
    info!(%publisher, count = views.len(), "publications listed");
    print_json(&views)
}

async fn fetch(config: &CliConfig, cid: &Cid, out: &Path) -> Result<()> {
    let store = open_store(config).await?;
    let bytes = store.fetch(cid).await?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("{} bytes written to {}", bytes.len(), out.display());
    Ok(())
}

async fn upload_review(config: &CliConfig, file: &Path) -> Result<()> {
    let raw = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read review {}", file.display()))?;
    let document: serde_json::Value =
        serde_json::from_slice(&raw).context("review must be a JSON document")?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "review.json".to_string());

    let store = open_store(config).await?;
    let stored = store
        .upload_json(&name, ContentKind::Review, &document)
        .await?;
    print_json(&stored)
}

async fn match_reviewers(reviewers: &Path, keywords: &str) -> Result<()> {
    let raw = tokio::fs::read_to_string(reviewers)
        .await
        .with_context(|| format!("failed to read reviewer list {}", reviewers.display()))?;
    let directory = ReviewerDirectory::from_json(&raw)?;

    let wanted: Vec<String> = keywords
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    let matched = directory.find_matching_reviewers(&wanted);
    print_json(&matched)
}
