mod config;
mod deck;
mod error;
mod jobs;
mod watch;

use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use job_tracking::{DeckFilter, JobTracker, KeyedStore, Store};
use persistence::{FileKeyValue, MongoKeyValue, TRACKING_COLLECTION};
use portal_api::PortalClient;
use std::time::Duration;

use crate::config::Settings;
use crate::error::Result;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Student whose saved jobs are tracked, defaults to PORTAL_USERNAME
    #[clap(long)]
    username: Option<String>,

    /// Where the tracking state is kept
    #[clap(long, value_enum, default_value_t = StoreKind::File)]
    store: StoreKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StoreKind {
    File,
    Mongo,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List postings not saved or hidden yet, and refresh statuses
    Deck {
        #[clap(long)]
        category: Option<String>,
        #[clap(long)]
        faculty: Option<String>,
    },
    /// Go through the deck one posting at a time
    Swipe {
        #[clap(long)]
        category: Option<String>,
        #[clap(long)]
        faculty: Option<String>,
    },
    /// Save a posting by identity (`id:12`, `12` or `demo:Company|Role`)
    Save { identity: String },
    /// Hide a posting from the deck without saving it
    Dismiss { identity: String },
    /// Show saved jobs with their application status
    Saved {
        #[clap(long)]
        json: bool,
    },
    /// Stop tracking a saved job, it stays out of the deck
    Remove { identity: String },
    /// Withdraw the application at the portal and put the job back in the deck
    Withdraw { identity: String },
    /// Let a hidden posting back into the deck
    Unhide { identity: String },
    /// Record that an application for a saved job was sent
    Submitted { identity: String },
    /// Pull application statuses from the portal
    Sync {},
    /// Print saved jobs whenever they change
    Watch {
        /// Seconds between re-reads of the store
        #[clap(long, default_value_t = 5)]
        interval: u64,
    },
}

async fn execute<S: Store>(tracker: JobTracker<S, PortalClient>, command: Commands) -> Result<()> {
    match command {
        Commands::Deck { category, faculty } => {
            deck::list(&tracker, DeckFilter::new(category, faculty)).await
        }
        Commands::Swipe { category, faculty } => {
            deck::swipe(&tracker, DeckFilter::new(category, faculty)).await
        }
        Commands::Save { identity } => deck::decide(&tracker, &identity, true).await,
        Commands::Dismiss { identity } => deck::decide(&tracker, &identity, false).await,
        Commands::Saved { json } => jobs::saved(&tracker, json).await,
        Commands::Remove { identity } => jobs::remove(&tracker, &identity).await,
        Commands::Withdraw { identity } => jobs::withdraw(&tracker, &identity).await,
        Commands::Unhide { identity } => jobs::unhide(&tracker, &identity).await,
        Commands::Submitted { identity } => jobs::submitted(&tracker, &identity).await,
        Commands::Sync {} => jobs::sync(&tracker).await,
        Commands::Watch { interval } => {
            watch::watch(&tracker, Duration::from_secs(interval.max(1))).await
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    let settings = Settings::from_env();
    let username = args.username.or_else(|| settings.username.clone());
    let client = PortalClient::new(&settings.base_url)?.with_token(settings.token.clone());
    log::debug!("using portal at {}", client.base_url());
    match args.store {
        StoreKind::File => {
            log::debug!("using store file {}", settings.store_path.display());
            let store = KeyedStore::new(FileKeyValue::new(&settings.store_path));
            execute(JobTracker::new(store, client, username), args.command).await
        }
        StoreKind::Mongo => {
            let (url, database) = settings.mongo()?;
            let db = persistence::connect(url, database).await?;
            let store = KeyedStore::new(MongoKeyValue::new(&db, TRACKING_COLLECTION));
            execute(JobTracker::new(store, client, username), args.command).await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let args = Cli::parse();
    if let Err(e) = run(args).await {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}
